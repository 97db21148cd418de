use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum OptionsError {
    #[snafu(display("locale '{raw}' is not supported"))]
    UnsupportedLocale { stage: &'static str, raw: String },
    #[snafu(display("base font size {value} is outside the supported 14-18 range"))]
    InvalidBaseFontSize { stage: &'static str, value: u8 },
    #[snafu(display("accent level {value} is outside the supported 0-3 range"))]
    InvalidAccentLevel { stage: &'static str, value: u8 },
}

pub type OptionsResult<T> = Result<T, OptionsError>;
