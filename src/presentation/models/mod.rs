use poem_openapi::Enum;

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum MessageTypeKind {
    #[oai(rename = "sms")]
    Sms,
    #[oai(rename = "whatsapp")]
    WhatsApp,
}
