mod beneficiary;

pub use beneficiary::{
    amount_max, format_amount, parse_amount, parse_year, Beneficiary, NewBeneficiary, YEAR_MAX,
    YEAR_MIN,
};
