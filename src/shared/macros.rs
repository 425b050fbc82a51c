/***************************************/
/*               Macros                */
/***************************************/

/**
 * Startup guard for `main`: unwraps a `Result` or stops the process.
 *
 * The error is logged together with the step that failed, e.g.
 * `unwrap_or_exit!(dispatcher.start(), "start elevators")` logs
 * `Could not start elevators: <error>` and exits with status 1.
 */
#[macro_export]
macro_rules! unwrap_or_exit {
    ($expr:expr, $step:expr) => {
        match $expr {
            Ok(value) => value,
            Err(e) => {
                log::error!("Could not {}: {}", $step, e);
                std::process::exit(1);
            }
        }
    };
}
