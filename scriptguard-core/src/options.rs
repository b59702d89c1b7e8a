//! Policy configuration
//!
//! A policy is built with [`SanitizerOptionsBuilder`] and frozen by
//! [`SanitizerOptionsBuilder::build`] into an immutable [`SanitizerOptions`]
//! that can be shared across threads behind an `Arc`. Deriving a new policy
//! from an existing one goes through [`SanitizerOptions::to_builder`].

use crate::listener::ListenerBinding;
use bitflags::bitflags;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied predicate consulted for names no set decides.
pub type ReservedIdentifierPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

// ============================================================================
// DEFAULT TABLES
// ============================================================================

/// Global names treated as legitimate capabilities by the default policy.
pub const DEFAULT_BUILT_IN_OBJECTS: &[&str] = &[
    "AbortController", "AbortSignal", "AggregateError", "Array", "ArrayBuffer", "Atomics",
    "BigInt", "BigInt64Array", "BigUint64Array", "Boolean", "Buffer", "DataView", "Date",
    "Decimal", "Error", "EvalError", "Event", "EventTarget", "FinalizationRegistry",
    "Float32Array", "Float64Array", "Function", "Infinity", "Int16Array", "Int32Array",
    "Int8Array", "Intl", "JSON", "Map", "Math", "MessageChannel", "MessageEvent",
    "MessagePort", "NaN", "Number", "Object", "Promise", "Proxy", "RangeError",
    "ReferenceError", "Reflect", "RegExp", "Set", "SharedArrayBuffer", "String", "Symbol",
    "SyntaxError", "TextDecoder", "TextEncoder", "TypeError", "URIError", "URL",
    "URLSearchParams", "Uint16Array", "Uint32Array", "Uint8Array", "Uint8ClampedArray",
    "WeakMap", "WeakRef", "WeakSet", "WebAssembly", "_", "_error", "assert", "async_hooks",
    "atob", "btoa", "buffer", "child_process", "clearImmediate", "clearInterval",
    "clearTimeout", "cluster", "console", "constants", "crypto", "decodeURI",
    "decodeURIComponent", "dgram", "diagnostics_channel", "dns", "domain", "encodeURI",
    "encodeURIComponent", "escape", "eval", "events", "fs", "global", "globalThis", "http",
    "http2", "https", "inspector", "isFinite", "isNaN", "module", "net", "os", "parseFloat",
    "parseInt", "path", "perf_hooks", "performance", "process", "punycode", "querystring",
    "queueMicrotask", "readline", "repl", "require", "setImmediate", "setInterval",
    "setTimeout", "stream", "string_decoder", "sys", "timers", "tls", "trace_events", "tty",
    "undefined", "unescape", "url", "util", "v8", "vm", "wasi", "worker_threads", "zlib",
];

/// Prototype pollution, reflection, dynamic code, timers and global aliases.
pub const DEFAULT_DISALLOWED_IDENTIFIERS: &[&str] = &[
    "__proto__", "apply", "AsyncFunction", "AsyncGenerator", "AsyncGeneratorFunction", "bind",
    "call", "clearInterval", "clearTimeout", "constructor", "defineProperty",
    "defineProperties", "eval", "Function", "global", "globalThis", "getPrototypeOf",
    "Generator", "GeneratorFunction", "Intl", "prototype", "Proxy", "Promise", "require",
    "Reflect", "setImmediate", "setInterval", "setTimeout", "setPrototypeOf", "Symbol",
    "uneval", "XMLHttpRequest", "WebAssembly", "window",
];

pub const DEFAULT_RESERVED_FUNCTION_IDENTIFIERS: &[&str] = &["main"];
pub const DEFAULT_RESERVED_IDENTIFIERS: &[&str] = &[];
pub const DEFAULT_RESERVED_MUTABLE_IDENTIFIERS: &[&str] = &[];

pub const DEFAULT_OPTIONS_NAME: &str = "Default";

static DEFAULT_OPTIONS: Lazy<Arc<SanitizerOptions>> =
    Lazy::new(|| Arc::new(SanitizerOptionsBuilder::new(DEFAULT_OPTIONS_NAME).build()));

// ============================================================================
// KEYWORDS
// ============================================================================

bitflags! {
    /// Keyword constructs enabled by a policy. Empty means all are denied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeywordFlags: u8 {
        const ASYNC = 0b0000_0001;
        const AWAIT = 0b0000_0010;
        const DEBUGGER = 0b0000_0100;
        const EXPORT = 0b0000_1000;
        const IMPORT = 0b0001_0000;
        const VAR = 0b0010_0000;
        const WITH = 0b0100_0000;
        const YIELD = 0b1000_0000;
    }
}

impl Default for KeywordFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// A keyword a policy can switch on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKeyword {
    Async,
    Await,
    Debugger,
    Export,
    Import,
    Var,
    With,
    Yield,
}

impl PolicyKeyword {
    pub const ALL: [PolicyKeyword; 8] = [
        PolicyKeyword::Async,
        PolicyKeyword::Await,
        PolicyKeyword::Debugger,
        PolicyKeyword::Export,
        PolicyKeyword::Import,
        PolicyKeyword::Var,
        PolicyKeyword::With,
        PolicyKeyword::Yield,
    ];

    pub fn from_name(name: &str) -> Option<PolicyKeyword> {
        PolicyKeyword::ALL.into_iter().find(|keyword| keyword.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKeyword::Async => "async",
            PolicyKeyword::Await => "await",
            PolicyKeyword::Debugger => "debugger",
            PolicyKeyword::Export => "export",
            PolicyKeyword::Import => "import",
            PolicyKeyword::Var => "var",
            PolicyKeyword::With => "with",
            PolicyKeyword::Yield => "yield",
        }
    }

    pub fn flag(self) -> KeywordFlags {
        match self {
            PolicyKeyword::Async => KeywordFlags::ASYNC,
            PolicyKeyword::Await => KeywordFlags::AWAIT,
            PolicyKeyword::Debugger => KeywordFlags::DEBUGGER,
            PolicyKeyword::Export => KeywordFlags::EXPORT,
            PolicyKeyword::Import => KeywordFlags::IMPORT,
            PolicyKeyword::Var => KeywordFlags::VAR,
            PolicyKeyword::With => KeywordFlags::WITH,
            PolicyKeyword::Yield => KeywordFlags::YIELD,
        }
    }
}

impl fmt::Display for PolicyKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// IDENTIFIER SETS
// ============================================================================

/// The five name sets a policy carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierSet {
    BuiltInObjects,
    Disallowed,
    Reserved,
    ReservedMutable,
    ReservedFunction,
}

impl IdentifierSet {
    pub const ALL: [IdentifierSet; 5] = [
        IdentifierSet::BuiltInObjects,
        IdentifierSet::Disallowed,
        IdentifierSet::Reserved,
        IdentifierSet::ReservedMutable,
        IdentifierSet::ReservedFunction,
    ];

    fn defaults(self) -> &'static [&'static str] {
        match self {
            IdentifierSet::BuiltInObjects => DEFAULT_BUILT_IN_OBJECTS,
            IdentifierSet::Disallowed => DEFAULT_DISALLOWED_IDENTIFIERS,
            IdentifierSet::Reserved => DEFAULT_RESERVED_IDENTIFIERS,
            IdentifierSet::ReservedMutable => DEFAULT_RESERVED_MUTABLE_IDENTIFIERS,
            IdentifierSet::ReservedFunction => DEFAULT_RESERVED_FUNCTION_IDENTIFIERS,
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
struct IdentifierSets {
    built_in_objects: BTreeSet<String>,
    disallowed: BTreeSet<String>,
    reserved: BTreeSet<String>,
    reserved_mutable: BTreeSet<String>,
    reserved_function: BTreeSet<String>,
}

impl IdentifierSets {
    fn defaults() -> Self {
        let mut sets = Self::default();
        for which in IdentifierSet::ALL {
            sets.get_mut(which)
                .extend(which.defaults().iter().map(|name| name.to_string()));
        }
        sets
    }

    fn get(&self, which: IdentifierSet) -> &BTreeSet<String> {
        match which {
            IdentifierSet::BuiltInObjects => &self.built_in_objects,
            IdentifierSet::Disallowed => &self.disallowed,
            IdentifierSet::Reserved => &self.reserved,
            IdentifierSet::ReservedMutable => &self.reserved_mutable,
            IdentifierSet::ReservedFunction => &self.reserved_function,
        }
    }

    fn get_mut(&mut self, which: IdentifierSet) -> &mut BTreeSet<String> {
        match which {
            IdentifierSet::BuiltInObjects => &mut self.built_in_objects,
            IdentifierSet::Disallowed => &mut self.disallowed,
            IdentifierSet::Reserved => &mut self.reserved,
            IdentifierSet::ReservedMutable => &mut self.reserved_mutable,
            IdentifierSet::ReservedFunction => &mut self.reserved_function,
        }
    }
}

// ============================================================================
// SANITIZER OPTIONS
// ============================================================================

/// An immutable policy.
#[derive(Clone)]
pub struct SanitizerOptions {
    name: String,
    sets: IdentifierSets,
    keywords: KeywordFlags,
    reserved_identifier_matcher: ReservedIdentifierPredicate,
    listener: ListenerBinding,
}

impl SanitizerOptions {
    /// The shared, strictest policy: default tables, every keyword denied.
    pub fn default_options() -> Arc<SanitizerOptions> {
        Arc::clone(&DEFAULT_OPTIONS)
    }

    pub fn builder(name: impl Into<String>) -> SanitizerOptionsBuilder {
        SanitizerOptionsBuilder::new(name)
    }

    /// An independent builder holding a copy of every set and toggle.
    /// The matcher and listener binding are shared, not copied.
    pub fn to_builder(&self) -> SanitizerOptionsBuilder {
        SanitizerOptionsBuilder {
            name: self.name.clone(),
            sets: self.sets.clone(),
            keywords: self.keywords,
            reserved_identifier_matcher: Arc::clone(&self.reserved_identifier_matcher),
            listener: self.listener.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifiers(&self, which: IdentifierSet) -> &BTreeSet<String> {
        self.sets.get(which)
    }

    pub fn contains(&self, which: IdentifierSet, identifier: &str) -> bool {
        self.sets.get(which).contains(identifier)
    }

    pub fn built_in_objects(&self) -> &BTreeSet<String> {
        &self.sets.built_in_objects
    }

    pub fn disallowed_identifiers(&self) -> &BTreeSet<String> {
        &self.sets.disallowed
    }

    pub fn reserved_identifiers(&self) -> &BTreeSet<String> {
        &self.sets.reserved
    }

    pub fn reserved_mutable_identifiers(&self) -> &BTreeSet<String> {
        &self.sets.reserved_mutable
    }

    pub fn reserved_function_identifiers(&self) -> &BTreeSet<String> {
        &self.sets.reserved_function
    }

    pub fn is_built_in_object(&self, identifier: &str) -> bool {
        self.sets.built_in_objects.contains(identifier)
    }

    pub fn is_disallowed(&self, identifier: &str) -> bool {
        self.sets.disallowed.contains(identifier)
    }

    /// In any of the three reserved sets.
    pub fn is_reserved(&self, identifier: &str) -> bool {
        self.sets.reserved.contains(identifier)
            || self.sets.reserved_mutable.contains(identifier)
            || self.sets.reserved_function.contains(identifier)
    }

    pub fn is_reserved_mutable(&self, identifier: &str) -> bool {
        self.sets.reserved_mutable.contains(identifier)
    }

    pub fn is_reserved_function(&self, identifier: &str) -> bool {
        self.sets.reserved_function.contains(identifier)
    }

    pub fn reserved_identifier_matcher(&self) -> &ReservedIdentifierPredicate {
        &self.reserved_identifier_matcher
    }

    pub fn keywords(&self) -> KeywordFlags {
        self.keywords
    }

    pub fn is_keyword_enabled(&self, keyword: PolicyKeyword) -> bool {
        self.keywords.contains(keyword.flag())
    }

    pub fn is_keyword_async_enabled(&self) -> bool {
        self.is_keyword_enabled(PolicyKeyword::Async)
    }

    pub fn is_keyword_await_enabled(&self) -> bool {
        self.is_keyword_enabled(PolicyKeyword::Await)
    }

    pub fn is_keyword_debugger_enabled(&self) -> bool {
        self.is_keyword_enabled(PolicyKeyword::Debugger)
    }

    pub fn is_keyword_export_enabled(&self) -> bool {
        self.is_keyword_enabled(PolicyKeyword::Export)
    }

    pub fn is_keyword_import_enabled(&self) -> bool {
        self.is_keyword_enabled(PolicyKeyword::Import)
    }

    pub fn is_keyword_var_enabled(&self) -> bool {
        self.is_keyword_enabled(PolicyKeyword::Var)
    }

    pub fn is_keyword_with_enabled(&self) -> bool {
        self.is_keyword_enabled(PolicyKeyword::With)
    }

    pub fn is_keyword_yield_enabled(&self) -> bool {
        self.is_keyword_enabled(PolicyKeyword::Yield)
    }

    pub fn listener(&self) -> &ListenerBinding {
        &self.listener
    }
}

impl fmt::Debug for SanitizerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanitizerOptions")
            .field("name", &self.name)
            .field("built_in_objects", &self.sets.built_in_objects.len())
            .field("disallowed", &self.sets.disallowed)
            .field("reserved", &self.sets.reserved)
            .field("reserved_mutable", &self.sets.reserved_mutable)
            .field("reserved_function", &self.sets.reserved_function)
            .field("keywords", &self.keywords)
            .field("listener", &self.listener.name())
            .finish_non_exhaustive()
    }
}

impl Default for SanitizerOptions {
    fn default() -> Self {
        DEFAULT_OPTIONS.as_ref().clone()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Mutable policy under construction.
///
/// Setters take and return the builder by value so a policy reads as one
/// chained expression.
#[derive(Clone)]
pub struct SanitizerOptionsBuilder {
    name: String,
    sets: IdentifierSets,
    keywords: KeywordFlags,
    reserved_identifier_matcher: ReservedIdentifierPredicate,
    listener: ListenerBinding,
}

impl SanitizerOptionsBuilder {
    /// Start from the default tables with every keyword denied and a matcher
    /// that accepts everything.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: IdentifierSets::defaults(),
            keywords: KeywordFlags::empty(),
            reserved_identifier_matcher: Arc::new(|_| true),
            listener: ListenerBinding::sanitizer(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn add<I, S>(mut self, which: IdentifierSet, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sets
            .get_mut(which)
            .extend(identifiers.into_iter().map(Into::into));
        self
    }

    pub fn remove<I, S>(mut self, which: IdentifierSet, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = self.sets.get_mut(which);
        for identifier in identifiers {
            set.remove(identifier.as_ref());
        }
        self
    }

    pub fn clear(mut self, which: IdentifierSet) -> Self {
        self.sets.get_mut(which).clear();
        self
    }

    pub fn add_built_in_objects<I, S>(self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(IdentifierSet::BuiltInObjects, identifiers)
    }

    pub fn remove_built_in_objects<I, S>(self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.remove(IdentifierSet::BuiltInObjects, identifiers)
    }

    pub fn clear_built_in_objects(self) -> Self {
        self.clear(IdentifierSet::BuiltInObjects)
    }

    pub fn add_disallowed_identifiers<I, S>(self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(IdentifierSet::Disallowed, identifiers)
    }

    pub fn remove_disallowed_identifiers<I, S>(self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.remove(IdentifierSet::Disallowed, identifiers)
    }

    pub fn clear_disallowed_identifiers(self) -> Self {
        self.clear(IdentifierSet::Disallowed)
    }

    pub fn add_reserved_identifiers<I, S>(self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(IdentifierSet::Reserved, identifiers)
    }

    pub fn remove_reserved_identifiers<I, S>(self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.remove(IdentifierSet::Reserved, identifiers)
    }

    pub fn clear_reserved_identifiers(self) -> Self {
        self.clear(IdentifierSet::Reserved)
    }

    pub fn add_reserved_mutable_identifiers<I, S>(self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(IdentifierSet::ReservedMutable, identifiers)
    }

    pub fn remove_reserved_mutable_identifiers<I, S>(self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.remove(IdentifierSet::ReservedMutable, identifiers)
    }

    pub fn clear_reserved_mutable_identifiers(self) -> Self {
        self.clear(IdentifierSet::ReservedMutable)
    }

    pub fn add_reserved_function_identifiers<I, S>(self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(IdentifierSet::ReservedFunction, identifiers)
    }

    pub fn remove_reserved_function_identifiers<I, S>(self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.remove(IdentifierSet::ReservedFunction, identifiers)
    }

    pub fn clear_reserved_function_identifiers(self) -> Self {
        self.clear(IdentifierSet::ReservedFunction)
    }

    pub fn reserved_identifier_matcher<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.reserved_identifier_matcher = Arc::new(matcher);
        self
    }

    pub fn shared_reserved_identifier_matcher(mut self, matcher: ReservedIdentifierPredicate) -> Self {
        self.reserved_identifier_matcher = matcher;
        self
    }

    pub fn keyword_enabled(mut self, keyword: PolicyKeyword, enabled: bool) -> Self {
        self.keywords.set(keyword.flag(), enabled);
        self
    }

    pub fn keywords(mut self, keywords: KeywordFlags) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn keyword_async_enabled(self, enabled: bool) -> Self {
        self.keyword_enabled(PolicyKeyword::Async, enabled)
    }

    pub fn keyword_await_enabled(self, enabled: bool) -> Self {
        self.keyword_enabled(PolicyKeyword::Await, enabled)
    }

    pub fn keyword_debugger_enabled(self, enabled: bool) -> Self {
        self.keyword_enabled(PolicyKeyword::Debugger, enabled)
    }

    pub fn keyword_export_enabled(self, enabled: bool) -> Self {
        self.keyword_enabled(PolicyKeyword::Export, enabled)
    }

    pub fn keyword_import_enabled(self, enabled: bool) -> Self {
        self.keyword_enabled(PolicyKeyword::Import, enabled)
    }

    pub fn keyword_var_enabled(self, enabled: bool) -> Self {
        self.keyword_enabled(PolicyKeyword::Var, enabled)
    }

    pub fn keyword_with_enabled(self, enabled: bool) -> Self {
        self.keyword_enabled(PolicyKeyword::With, enabled)
    }

    pub fn keyword_yield_enabled(self, enabled: bool) -> Self {
        self.keyword_enabled(PolicyKeyword::Yield, enabled)
    }

    pub fn listener(mut self, listener: ListenerBinding) -> Self {
        self.listener = listener;
        self
    }

    /// Freeze the policy.
    pub fn build(self) -> SanitizerOptions {
        SanitizerOptions {
            name: self.name,
            sets: self.sets,
            keywords: self.keywords,
            reserved_identifier_matcher: self.reserved_identifier_matcher,
            listener: self.listener,
        }
    }

    /// Freeze the policy for sharing.
    pub fn build_shared(self) -> Arc<SanitizerOptions> {
        Arc::new(self.build())
    }
}

impl fmt::Debug for SanitizerOptionsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanitizerOptionsBuilder")
            .field("name", &self.name)
            .field("keywords", &self.keywords)
            .field("listener", &self.listener.name())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_options_are_send_sync() {
        assert_send_sync::<SanitizerOptions>();
        assert_send_sync::<Arc<SanitizerOptions>>();
    }

    #[test]
    fn test_default_options() {
        let options = SanitizerOptions::default_options();
        assert_eq!(options.name(), "Default");
        assert!(options.keywords().is_empty());
        assert!(options.is_built_in_object("JSON"));
        assert!(options.is_disallowed("eval"));
        assert!(options.is_disallowed("constructor"));
        assert!(options.is_reserved_function("main"));
        assert!(options.reserved_identifiers().is_empty());
        assert!(options.reserved_mutable_identifiers().is_empty());
        assert!((options.reserved_identifier_matcher())("anything"));
        assert_eq!(options.listener().name(), "SanitizerListener");
        assert_eq!(options.built_in_objects().len(), DEFAULT_BUILT_IN_OBJECTS.len());
    }

    #[test]
    fn test_default_is_shared() {
        let a = SanitizerOptions::default_options();
        let b = SanitizerOptions::default_options();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_keyword_toggles() {
        let options = SanitizerOptionsBuilder::new("kw")
            .keyword_async_enabled(true)
            .keyword_var_enabled(true)
            .keyword_var_enabled(false)
            .keyword_yield_enabled(true)
            .build();
        assert!(options.is_keyword_async_enabled());
        assert!(!options.is_keyword_var_enabled());
        assert!(options.is_keyword_yield_enabled());
        assert_eq!(options.keywords(), KeywordFlags::ASYNC | KeywordFlags::YIELD);
    }

    #[test]
    fn test_to_builder_copies_everything() {
        let original = SanitizerOptionsBuilder::new("base")
            .keyword_var_enabled(true)
            .keyword_with_enabled(true)
            .add_reserved_mutable_identifiers(["state"])
            .reserved_identifier_matcher(|id| id.starts_with('$'))
            .build();

        let derived = original
            .to_builder()
            .remove_reserved_mutable_identifiers(["state"])
            .add_disallowed_identifiers(["fetch"])
            .build();

        assert!(derived.is_keyword_var_enabled());
        assert!(derived.is_keyword_with_enabled());
        assert!(Arc::ptr_eq(
            original.reserved_identifier_matcher(),
            derived.reserved_identifier_matcher()
        ));
        assert!(original.is_reserved_mutable("state"));
        assert!(!original.is_disallowed("fetch"));
        assert!(derived.is_disallowed("fetch"));
        assert!(!derived.is_reserved_mutable("state"));
    }

    #[test]
    fn test_clear_and_reserved_lookup() {
        let options = SanitizerOptionsBuilder::new("empty")
            .clear_built_in_objects()
            .clear_reserved_function_identifiers()
            .add_reserved_identifiers(["input"])
            .build();
        assert!(options.built_in_objects().is_empty());
        assert!(options.is_reserved("input"));
        assert!(!options.is_reserved("main"));
        assert!(options.contains(IdentifierSet::Reserved, "input"));
    }

    #[test]
    fn test_policy_keyword_names() {
        let names: Vec<_> = PolicyKeyword::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            names,
            ["async", "await", "debugger", "export", "import", "var", "with", "yield"]
        );
        let all = PolicyKeyword::ALL
            .iter()
            .fold(KeywordFlags::empty(), |acc, k| acc | k.flag());
        assert_eq!(all, KeywordFlags::all());
        assert_eq!(PolicyKeyword::from_name("with"), Some(PolicyKeyword::With));
        assert_eq!(PolicyKeyword::from_name("goto"), None);
    }
}
