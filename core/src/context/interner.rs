use lasso::{Spur, ThreadedRodeo};
use std::sync::OnceLock;

/// Interned key for unit names, handles and ability names.
pub type IStr = Spur;

/// Process-wide interner. Names repeat on nearly every line of a log.
static INTERNER: OnceLock<ThreadedRodeo> = OnceLock::new();

static EMPTY_ISTR: OnceLock<Spur> = OnceLock::new();

pub fn interner() -> &'static ThreadedRodeo {
    INTERNER.get_or_init(ThreadedRodeo::default)
}

pub fn intern(s: &str) -> IStr {
    interner().get_or_intern(s)
}

/// Key for "". `IStr::default()` is whatever string was interned first.
#[inline]
pub fn empty_istr() -> IStr {
    *EMPTY_ISTR.get_or_init(|| interner().get_or_intern(""))
}

pub fn resolve(key: IStr) -> &'static str {
    interner().resolve(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_key() {
        let a = intern("@aela");
        let b = intern("@aela");
        assert_eq!(a, b);
        assert_eq!(resolve(a), "@aela");
        assert_eq!(resolve(empty_istr()), "");
        assert_ne!(intern("@brin"), a);
    }
}
