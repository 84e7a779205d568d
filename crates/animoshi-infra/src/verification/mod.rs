//! Human verification backends.

mod recaptcha;

pub use recaptcha::{RecaptchaConfig, RecaptchaVerifier};
