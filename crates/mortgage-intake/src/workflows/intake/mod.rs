//! The rate wizard: answers, step sequencing, conditional fields, per-step
//! validation and saved progress.

pub mod conditional;
pub mod defaults;
pub mod domain;
pub mod session;
pub mod steps;
pub mod store;
pub mod validation;

pub use conditional::{
    affordability, affordability_at, field_help_text, get_conditional_validation_rules,
    get_dynamic_suggestions, get_smart_field_value, is_field_required, minimum_down_payment,
    should_show_field, AffordabilityEstimate, ConditionalField, FieldValue, FormField,
    ValidationRule, GDS_RATIO, QUALIFYING_RATE,
};
pub use defaults::{
    generate_smart_defaults, location_recommendations, market_data, LocationRecommendations,
    MarketData, MarketRecommendation, PROVINCE_AVERAGE,
};
pub use domain::{
    format_dollars, CreditHistory, CreditScoreBracket, CurrentMortgages, DollarRange,
    EmploymentStatus, FinancialInfo, FormData, FormDataPatch, LoanAmountBracket, LoanDetails,
    LoanPurpose, PersonalInfo, PropertyInfo, PropertyType, PropertyUsage, PropertyValueBracket,
    Province, SupplementalInfo, ValidationErrors,
};
pub use session::FormSession;
pub use steps::{
    calculate_estimated_time, get_form_steps, FormStep, StepFlow, StepPosition, WizardStep,
    MAX_STEPS,
};
pub use store::{
    FileProgressStore, InMemoryProgressStore, ProgressStore, StoreError, PROGRESS_KEY,
};
pub use validation::{validate_email, validate_form_step, validate_phone, StepValidator};
