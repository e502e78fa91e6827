use std::fmt;

/// Log-safe rendering of a booking e-mail.
///
/// Keeps the first character of the local part and the domain, so log lines
/// stay greppable per event organiser without exposing the address:
/// `ana@x.com` prints as `a***@x.com`. Values without a usable `@` (partial
/// search terms, for instance) print as `***`.
#[derive(Clone, Copy)]
pub struct MaskedEmail<'a>(pub &'a str);

impl fmt::Display for MaskedEmail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.split_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                let first = local.chars().next().unwrap_or('*');
                write!(f, "{}***@{}", first, domain)
            }
            _ => write!(f, "***"),
        }
    }
}

impl fmt::Debug for MaskedEmail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
