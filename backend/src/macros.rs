//! Crate-internal macros.

/// Implements `fmt::Debug` while hiding secrets.
///
/// Each field is listed with a keyword:
/// `show` prints it, `redact` prints `"[REDACTED]"`, and `redact_option`
/// prints `Some("[REDACTED]")` or `None`.
///
/// ```ignore
/// redacted_debug!(ServiceAccount {
///     show client_email,
///     redact private_key,
/// });
/// ```
macro_rules! redacted_debug {
    ($name:ident { $( $kind:ident $field:ident ),* $(,)? }) => {
        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let mut out = f.debug_struct(stringify!($name));
                $( redacted_debug!(@field out, self, $kind, $field); )*
                out.finish()
            }
        }
    };
    (@field $out:ident, $self:ident, show, $field:ident) => {
        $out.field(stringify!($field), &$self.$field);
    };
    (@field $out:ident, $self:ident, redact, $field:ident) => {
        $out.field(stringify!($field), &"[REDACTED]");
    };
    (@field $out:ident, $self:ident, redact_option, $field:ident) => {
        $out.field(
            stringify!($field),
            &$self.$field.as_ref().map(|_| "[REDACTED]"),
        );
    };
}
