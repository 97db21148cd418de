use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AdapterError {
    #[snafu(display("adapter already has a bound element; unbind before rebinding"))]
    AlreadyBound { stage: &'static str },
}

pub type HostResult<T> = Result<T, AdapterError>;
