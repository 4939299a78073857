//! # Confirmation Surface
//!
//! Where the checkout message goes. The terminal implements it by printing
//! the message and waiting for Enter; tests record it.

/// A blocking, acknowledge-only message surface.
pub trait ConfirmationSurface {
    /// Shows `message` and returns once the user has acknowledged it.
    fn present(&mut self, message: &str);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ConfirmationSurface;

    /// Keeps every presented message.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub messages: Vec<String>,
    }

    impl ConfirmationSurface for RecordingSurface {
        fn present(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
    }
}
