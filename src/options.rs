use clap::{ArgAction, Args};

/// Options shared by every subcommand
#[derive(Debug, Args)]
pub struct CommonOptions {
    /// Number of elements to allocate room for up front (also the growth step)
    #[arg(long, required = false, default_value = "16")]
    pub capacity: usize,

    /// Verify heap order and element positions after every change
    #[arg(long,
        action = ArgAction::Set,
        default_value_t = false,
        default_missing_value = "true",
        num_args = 0..=1,)]
    pub check: bool,
}

impl Default for CommonOptions {
    fn default() -> Self {
        CommonOptions {
            capacity: 16,
            check: false,
        }
    }
}
