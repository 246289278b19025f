pub mod aggregate;
pub mod summarize;

use clap::Args;

use amortise_core::Rounding;

/// Presentation rounding flags shared by every command
#[derive(Args, Debug, Clone)]
pub struct RoundingArgs {
    /// Decimal places for every reported amount
    #[arg(long, default_value_t = amortise_core::rounding::DEFAULT_DECIMALS)]
    pub decimals: u32,

    /// Report full double precision
    #[arg(long, conflicts_with = "decimals")]
    pub no_rounding: bool,
}

impl RoundingArgs {
    pub fn rounding(&self) -> Rounding {
        Rounding::from_decimals((!self.no_rounding).then_some(self.decimals))
    }
}
