//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// The organization part of the User-Agent string sent with every HTTP request.
/// Feel free to override it when initing this library.
pub static ORG_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("My organization".to_string())));

/// The product part of the User-Agent string sent with every HTTP request.
/// Feel free to override it when initing this library.
pub static PRODUCT_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Corkboard".to_string())));

/// The User-Agent string the HTTP client identifies itself with
pub fn user_agent() -> String {
    let org = ORG_NAME.lock().unwrap();
    let product = PRODUCT_NAME.lock().unwrap();
    format!("{} ({})", *product, *org)
}
