#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod dcf;
pub mod error;
pub mod frame;
pub mod record;
pub mod registry;
pub mod round;
pub mod traits;
pub mod valuation;
pub mod wacc;

// Re-export core types
pub use classify::{PriceComparison, Verdict, compare_to_price};
pub use dcf::{
    Dcf, DcfConfig, DcfInputs, DcfValuation, DiscountRate, GrowthBounds, MAX_HORIZON_YEARS,
    intrinsic_value,
};
pub use error::{Result, ValuationError};
pub use frame::{FrameSchema, RateUnit, read_csv, records_from_frame, valuations_to_frame};
pub use record::CompanyRecord;
pub use registry::{Country, MarketAssumptions, MarketRegistry};
pub use round::round_to;
pub use traits::{ConfigurableModel, Model, ModelConfig};
pub use valuation::{CompanyValuation, SkipReason, ValuationConfig, ValuationSummary, Valuator};
pub use wacc::{RiskTier, Wacc, WaccBreakdown, WaccConfig, WaccInputs, compute_wacc};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
