//! Document type labels shared by the vendor extractors.

pub const BILL: &str = "Bill";
pub const CERTIFICATE_OF_INTEREST: &str = "Certificate of Interest";
pub const CREDIT_CARD_STATEMENT: &str = "Credit Card Statement";
pub const INVOICE: &str = "Invoice";
pub const PAYSLIP: &str = "Payslip";
pub const STATEMENT: &str = "Statement";
pub const STATEMENT_OF_FEES: &str = "Statement of Fees";
pub const TAX_CERTIFICATE: &str = "Tax Certificate";
