pub mod approval;
pub mod brevo;
pub mod clock;
pub mod naming;
