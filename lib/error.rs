pub type Result<T, PINER> = core::result::Result<T, Error<PINER>>;

#[derive(Debug, PartialEq)]
pub enum Error<PIN> {
    // Serial output pin error
    Pin(PIN),
}
