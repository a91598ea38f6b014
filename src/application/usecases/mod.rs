pub mod send_transactional_sms;
pub mod send_whatsapp_campaign;
