//! Runtime parameters exposed to the console.
//!
//! All values live in atomics so the console (main loop), peripheral
//! drivers and interrupt handlers can read them without locks. Every
//! accepted write bumps `generation`, which the main loop compares to know
//! when to push new values to hardware.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use thiserror::Error;

/// Default PWM frequency (80 MHz / 40000).
pub const DEFAULT_PWM_FREQ_HZ: u32 = 2_000;
/// Default PWM duty cycle.
pub const DEFAULT_PWM_DUTY_PCT: u8 = 50;
/// Default LED toggle period.
pub const DEFAULT_LED_PERIOD_MS: u32 = 500;

/// Highest ADC input channel.
pub const ADC_MAX_CHANNEL: u8 = 11;
/// ADC sampling frequency bounds.
pub const ADC_MIN_FREQ_HZ: u32 = 100;
pub const ADC_MAX_FREQ_HZ: u32 = 10_000;
/// ADC capture length bound.
pub const ADC_MAX_SAMPLES: u32 = 4096;

/// Device configuration (lock-free).
pub struct DeviceConfig {
    pub pwm_freq_hz: AtomicU32,
    pub pwm_duty_pct: AtomicU8,
    pub led_enabled: AtomicBool,
    pub led_period_ms: AtomicU32,
    pub adc_channel: AtomicU8,
    pub adc_freq_hz: AtomicU32,
    pub adc_samples: AtomicU32,
    adc_pending: AtomicBool,
    generation: AtomicU32,
}

/// A pending ADC capture, as requested from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcRequest {
    pub channel: u8,
    pub freq_hz: u32,
    pub samples: u32,
}

impl DeviceConfig {
    pub const fn new() -> Self {
        Self {
            pwm_freq_hz: AtomicU32::new(DEFAULT_PWM_FREQ_HZ),
            pwm_duty_pct: AtomicU8::new(DEFAULT_PWM_DUTY_PCT),
            led_enabled: AtomicBool::new(false),
            led_period_ms: AtomicU32::new(DEFAULT_LED_PERIOD_MS),
            adc_channel: AtomicU8::new(0),
            adc_freq_hz: AtomicU32::new(ADC_MIN_FREQ_HZ),
            adc_samples: AtomicU32::new(0),
            adc_pending: AtomicBool::new(false),
            generation: AtomicU32::new(0),
        }
    }

    /// Change counter, incremented on every accepted write.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation.load(Ordering::Acquire)
    }

    #[inline]
    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Enable or disable the periodic LED task.
    pub fn set_led(&self, enabled: bool, period_ms: u32) {
        self.led_period_ms.store(period_ms, Ordering::Relaxed);
        self.led_enabled.store(enabled, Ordering::Release);
        self.bump();
    }

    /// Queue an ADC capture (replaces any capture not yet taken).
    pub fn request_adc(&self, req: AdcRequest) {
        self.adc_channel.store(req.channel, Ordering::Relaxed);
        self.adc_freq_hz.store(req.freq_hz, Ordering::Relaxed);
        self.adc_samples.store(req.samples, Ordering::Relaxed);
        self.adc_pending.store(true, Ordering::Release);
        self.bump();
    }

    /// Take the pending ADC capture, if any.
    pub fn take_adc_request(&self) -> Option<AdcRequest> {
        if !self.adc_pending.swap(false, Ordering::AcqRel) {
            return None;
        }
        Some(AdcRequest {
            channel: self.adc_channel.load(Ordering::Relaxed),
            freq_hz: self.adc_freq_hz.load(Ordering::Relaxed),
            samples: self.adc_samples.load(Ordering::Relaxed),
        })
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Global configuration instance.
pub static CONFIG: DeviceConfig = DeviceConfig::new();

/// Parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamValue {
    Bool(bool),
    U8(u8),
    U32(u32),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::U8(n) => write!(f, "{}", n),
            ParamValue::U32(n) => write!(f, "{}", n),
        }
    }
}

/// Parameter type with inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Bool,
    U8 { min: u8, max: u8 },
    U32 { min: u32, max: u32 },
}

/// Rejected parameter write
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParamSetError {
    #[error("invalid value")]
    Invalid,
    #[error("out of range")]
    OutOfRange,
}

impl ParamType {
    /// Parse and range-check a console token
    pub fn parse(&self, text: &str) -> Result<ParamValue, ParamSetError> {
        match *self {
            ParamType::Bool => match text {
                "true" | "1" | "on" => Ok(ParamValue::Bool(true)),
                "false" | "0" | "off" => Ok(ParamValue::Bool(false)),
                _ => Err(ParamSetError::Invalid),
            },
            ParamType::U8 { min, max } => {
                let v: u8 = text.parse().map_err(|_| ParamSetError::Invalid)?;
                if v < min || v > max {
                    return Err(ParamSetError::OutOfRange);
                }
                Ok(ParamValue::U8(v))
            }
            ParamType::U32 { min, max } => {
                let v: u32 = text.parse().map_err(|_| ParamSetError::Invalid)?;
                if v < min || v > max {
                    return Err(ParamSetError::OutOfRange);
                }
                Ok(ParamValue::U32(v))
            }
        }
    }
}

/// Console-visible parameter
pub struct ParamDescriptor {
    pub name: &'static str,
    pub brief: &'static str,
    pub param_type: ParamType,
    pub get_fn: fn() -> ParamValue,
    pub set_fn: fn(ParamValue) -> Result<(), ParamSetError>,
}

impl ParamDescriptor {
    /// Parse, validate and store a value
    pub fn set_from_str(&self, text: &str) -> Result<ParamValue, ParamSetError> {
        let value = self.param_type.parse(text)?;
        (self.set_fn)(value)?;
        Ok(value)
    }

    /// Current value
    pub fn get(&self) -> ParamValue {
        (self.get_fn)()
    }
}

/// All parameters reachable through `set` / `get`
pub static PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor {
        name: "pwmFreq",
        brief: "PWM0A frequency in Hz",
        param_type: ParamType::U32 { min: 625, max: 99_999 },
        get_fn: || ParamValue::U32(CONFIG.pwm_freq_hz.load(Ordering::Relaxed)),
        set_fn: set_pwm_freq,
    },
    ParamDescriptor {
        name: "pwmDuty",
        brief: "PWM0A duty cycle in percent",
        param_type: ParamType::U8 { min: 0, max: 100 },
        get_fn: || ParamValue::U8(CONFIG.pwm_duty_pct.load(Ordering::Relaxed)),
        set_fn: set_pwm_duty,
    },
    ParamDescriptor {
        name: "ledPeriod",
        brief: "LED toggle period in ms",
        param_type: ParamType::U32 { min: 1, max: 10_000 },
        get_fn: || ParamValue::U32(CONFIG.led_period_ms.load(Ordering::Relaxed)),
        set_fn: set_led_period,
    },
];

fn set_pwm_freq(v: ParamValue) -> Result<(), ParamSetError> {
    let ParamValue::U32(hz) = v else {
        return Err(ParamSetError::Invalid);
    };
    CONFIG.pwm_freq_hz.store(hz, Ordering::Relaxed);
    CONFIG.bump();
    Ok(())
}

fn set_pwm_duty(v: ParamValue) -> Result<(), ParamSetError> {
    let ParamValue::U8(pct) = v else {
        return Err(ParamSetError::Invalid);
    };
    if pct > 100 {
        return Err(ParamSetError::OutOfRange);
    }
    CONFIG.pwm_duty_pct.store(pct, Ordering::Relaxed);
    CONFIG.bump();
    Ok(())
}

fn set_led_period(v: ParamValue) -> Result<(), ParamSetError> {
    let ParamValue::U32(ms) = v else {
        return Err(ParamSetError::Invalid);
    };
    CONFIG.led_period_ms.store(ms, Ordering::Relaxed);
    CONFIG.bump();
    Ok(())
}

/// Find a parameter by exact name
pub fn find_param(name: &str) -> Option<&'static ParamDescriptor> {
    PARAMS.iter().find(|p| p.name == name)
}

/// Parameters matching `prefix*`, or the exact name without `*`
pub fn find_params_matching(pattern: &str) -> impl Iterator<Item = &'static ParamDescriptor> + '_ {
    let (stem, wildcard) = match pattern.strip_suffix('*') {
        Some(stem) => (stem, true),
        None => (pattern, false),
    };
    PARAMS
        .iter()
        .filter(move |p| if wildcard { p.name.starts_with(stem) } else { p.name == stem })
}

/// All parameter names
pub fn param_names() -> impl Iterator<Item = &'static str> + Clone {
    PARAMS.iter().map(|p| p.name)
}
