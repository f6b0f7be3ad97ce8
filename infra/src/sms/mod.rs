//! SMS gateway implementations

pub mod mock_sms;
pub mod sms_ir;

pub use mock_sms::MockSmsGateway;
pub use sms_ir::SmsIrGateway;
