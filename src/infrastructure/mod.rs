pub mod brevo;
