/***************************************/
/*               Macros                */
/***************************************/

/// Unwraps a `Result`, or logs the error with its context chain and exits the
/// process with status 1. Only meant for setup code in the binary.
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(e) => {
                log::error!("{:#}", e);
                std::process::exit(1);
            }
        }
    };
}
