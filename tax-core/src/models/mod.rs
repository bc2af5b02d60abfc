mod tax_bracket;
mod tax_breakdown;

pub use tax_bracket::{TaxBracket, TaxYearBrackets};
pub use tax_breakdown::{BandTax, TaxBreakdown};
