//! Outbound confirmation messages.
//!
//! There is no automated messaging integration. Confirming an order builds a
//! WhatsApp deep link and opens it with the OS default handler so a human can
//! hit send. Delivery is never confirmed and failures never reach the caller.

use tracing::{info, warn};
use url::Url;

/// Notification port. The production implementation is [`WhatsApp`]; tests
/// swap in a recording stub.
pub trait Notify: Send + Sync {
    fn dispatch(&self, phone: &str, message: &str);
}

pub struct WhatsApp {
    /// Country code glued in front of the customer phone number, with no
    /// validation of the number itself.
    pub country_prefix: String,
}

impl Notify for WhatsApp {
    fn dispatch(&self, phone: &str, message: &str) {
        let link = match deep_link(&self.country_prefix, phone, message) {
            Ok(link) => link,
            Err(e) => {
                warn!("Could not build WhatsApp link for {phone}: {e}");
                return;
            }
        };

        match open::that(link.as_str()) {
            Ok(()) => info!("Opened WhatsApp link for {phone}"),
            Err(e) => warn!("Failed to open WhatsApp link for {phone}: {e}"),
        }
    }
}

pub fn deep_link(prefix: &str, phone: &str, message: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("https://wa.me/{prefix}{phone}"))?;
    url.query_pairs_mut().append_pair("text", message);

    Ok(url)
}

pub fn confirmation_message(customer: &str, product: &str) -> String {
    format!(
        "Hello {customer}, your order for ({product}) has been confirmed \u{2705}\nThank you for trusting us \u{2764}"
    )
}
