use thiserror::Error;
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid heading: {}",.0)]
    InvalidHeading(u32),
    #[error("Invalid altitude: {} ft",.0)]
    InvalidAltitude(u32),
    #[error("Invalid runway number: {}",.0)]
    InvalidRunway(u32),
    #[error("Invalid runway side: {}",.0)]
    InvalidRunwaySide(String),
    #[error("Invalid speed: {} kt",.0)]
    InvalidSpeed(u32),
    #[error("Invalid squawk code: {}",.0)]
    InvalidSquawk(String),
    #[error("Not a number: {:?}",.0)]
    InvalidNumber(String),
    #[error("Serde Json (de)serialization failed!")]
    SerdeDeserialize(#[from] serde_json::Error),
    #[error("Std Io Error!")]
    StdIo(#[from] std::io::Error),
}
