pub(crate) static IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
pub(crate) static PREFER_HEADER: &str = "Prefer";
pub(crate) static RETURN_REPRESENTATION: &str = "return=representation";
pub(crate) static API_KEY_HEADER: &str = "apikey";
