//! Module: config
//!
//! Purpose: Configuration system for RustUartShell.
//!
//! Architecture:
//! - Compile-time sizing lives next to its users (`LINE_SIZE`,
//!   `HISTORY_DEPTH`, queue sizes, `UartConfig`)
//! - Runtime parameters live in [`CONFIG`], edited from the console
//!   through the [`PARAMS`] table
//! - All runtime config atomically accessible (lock-free)
//!
//! Safety: interrupt-safe. All access via atomics, no locks.

pub mod params;

// Re-export public API
pub use params::{
    AdcRequest, DeviceConfig, ParamDescriptor, ParamSetError, ParamType, ParamValue, CONFIG,
    PARAMS, ADC_MAX_CHANNEL, ADC_MAX_FREQ_HZ, ADC_MAX_SAMPLES, ADC_MIN_FREQ_HZ,
    find_param, find_params_matching, param_names,
};
