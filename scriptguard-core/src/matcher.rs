//! Identifier matcher
//!
//! Decides whether a name may appear in checked code. First match wins:
//!
//! 1. disallowed set: rejected, even when also a built-in
//! 2. built-in objects: allowed
//! 3. any reserved set: allowed
//! 4. otherwise the policy's reserved identifier predicate decides

use crate::options::SanitizerOptions;

pub fn matches(options: &SanitizerOptions, identifier: &str) -> bool {
    if options.is_disallowed(identifier) {
        return false;
    }
    if options.is_built_in_object(identifier) || options.is_reserved(identifier) {
        return true;
    }
    (options.reserved_identifier_matcher())(identifier)
}
