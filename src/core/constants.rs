// Audit actions recorded by the ledger client
pub const USER_REGISTERED: &str = "USER_REGISTERED";
pub const USER_RESOLVED: &str = "USER_RESOLVED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const SUMMARY_QUERIED: &str = "SUMMARY_QUERIED";
pub const SETTLEMENTS_COMPUTED: &str = "SETTLEMENTS_COMPUTED";

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 255;
pub const MAX_AMOUNT: i64 = 1_000_000;
