//! # Parameter Synchronizer
//!
//! Mirrors form fields to query-string parameters so a calculator configuration
//! can be bookmarked. The address bar is passed in and out explicitly as a
//! [`Location`]; nothing here touches global state.
//!
//! - [`hydrate`] seeds a form from a query once, on load.
//! - [`reconcile`] computes the query a form should be mirrored to, or `None`
//!   when the current one already matches.
//! - [`ParamSync`] ties both to one location for the lifetime of a page.

use std::collections::BTreeMap;
use std::fmt;

use models::ParamForm;
use url::Url;

mod query;

pub use query::QueryParams;

/// Overwrites every field whose key is present in `query`, empty values included.
/// Returns the number of fields taken from the query.
pub fn hydrate<F: ParamForm>(form: &mut F, query: &QueryParams) -> usize {
    let mut applied = 0;
    for key in F::KEYS {
        if let Some(value) = query.get(key) {
            form.set_field(key, value);
            applied += 1;
        }
    }
    applied
}

/// `current` with the form's fields written over it. Unrelated parameters keep
/// their place; blank fields drop their parameter.
pub fn target_query<F: ParamForm>(form: &F, current: &QueryParams) -> QueryParams {
    let mut next = current.clone();
    for key in F::KEYS {
        let value = form.field(key).unwrap_or_default().trim();
        if value.is_empty() {
            next.delete(key);
        } else {
            next.set(key, value);
        }
    }
    next
}

/// The query to replace `current` with, or `None` when both serialize the same.
pub fn reconcile<F: ParamForm>(form: &F, current: &QueryParams) -> Option<QueryParams> {
    let next = target_query(form, current);
    if next.to_string() == current.to_string() {
        None
    } else {
        Some(next)
    }
}

/// Applies configured default texts on top of the built-in ones.
/// Keys the form does not know are skipped and reported back.
pub fn seed_defaults<F: ParamForm>(overrides: &BTreeMap<String, String>) -> (F, Vec<String>) {
    let mut form = F::default();
    let mut unknown = Vec::new();
    for (key, text) in overrides {
        if !form.set_field(key, text.as_str()) {
            unknown.push(key.clone());
        }
    }
    (form, unknown)
}

/// The address bar of one calculator page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(input)?,
        })
    }

    pub fn query(&self) -> QueryParams {
        QueryParams::parse(self.url.query().unwrap_or(""))
    }

    /// Path plus query, the way it is handed to a history replace.
    pub fn relative(&self) -> String {
        match self.url.query() {
            Some(q) if !q.is_empty() => format!("{}?{}", self.url.path(), q),
            _ => self.url.path().to_string(),
        }
    }

    /// Swaps the query in place. The path and fragment stay untouched.
    pub fn replace_query(&mut self, query: &QueryParams) {
        if query.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.set_query(Some(&query.to_string()));
        }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// A form bound to its location: hydrated once at mount, mirrored on every sync.
#[derive(Debug, Clone)]
pub struct ParamSync<F> {
    form: F,
    location: Location,
    replacements: usize,
}

impl<F: ParamForm> ParamSync<F> {
    /// Seeds `defaults` from the location's query. This is the only read of the query.
    pub fn mount(mut defaults: F, location: Location) -> Self {
        let applied = hydrate(&mut defaults, &location.query());
        tracing::debug!(url = %location, applied, "hydrated form from query");
        Self {
            form: defaults,
            location,
            replacements: 0,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// How many times the location was replaced since mount.
    pub fn replacements(&self) -> usize {
        self.replacements
    }

    /// Edits one field. Returns false when the form has no such key.
    pub fn edit(&mut self, key: &str, text: impl Into<String>) -> bool {
        self.form.set_field(key, text)
    }

    /// Mirrors the form into the location. Returns true when the location was replaced.
    pub fn sync(&mut self) -> bool {
        match reconcile(&self.form, &self.location.query()) {
            Some(next) => {
                self.location.replace_query(&next);
                self.replacements += 1;
                tracing::debug!(url = %self.location, "replaced location");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{PayloadFleetInputs, SingleClassInputs};

    fn location(url: &str) -> Location {
        Location::parse(url).unwrap()
    }

    #[test]
    fn test_hydrate_overwrites_present_keys_only() {
        let mut form = PayloadFleetInputs::default();
        let applied = hydrate(&mut form, &QueryParams::parse("sr=7&h=&foo=bar"));
        assert_eq!(applied, 2);
        assert_eq!(form.small_robots, "7");
        assert_eq!(form.operating_hours, "");
        assert_eq!(form.medium_robots, "20");
    }

    #[test]
    fn test_hydrate_accepts_text_verbatim() {
        let mut form = SingleClassInputs::default();
        hydrate(&mut form, &QueryParams::parse("avg=lots&ec=0%2C2"));
        assert_eq!(form.avg_consumption_kw, "lots");
        assert_eq!(form.energy_cost, "0,2");
    }

    #[test]
    fn test_reconcile_is_none_when_in_sync() {
        let form = PayloadFleetInputs::default();
        let current = QueryParams::parse("sr=50&mr=20&lr=10&xr=2&ec=0.18&h=5000&lt=5");
        assert_eq!(reconcile(&form, &current), None);
    }

    #[test]
    fn test_reconcile_preserves_unrelated_parameters() {
        let form = PayloadFleetInputs::default();
        let next = reconcile(&form, &QueryParams::parse("utm=mail&sr=1")).unwrap();
        assert_eq!(
            next.to_string(),
            "utm=mail&sr=50&mr=20&lr=10&xr=2&ec=0.18&h=5000&lt=5"
        );
    }

    #[test]
    fn test_reconcile_trims_and_clears() {
        let mut form = SingleClassInputs::default();
        form.robot_count = "  12 ".to_string();
        form.optimizable_percent = "   ".to_string();
        let next = reconcile(&form, &QueryParams::parse("oz=40")).unwrap();
        assert_eq!(next.get("r"), Some("12"));
        assert!(!next.contains("oz"));
    }

    #[test]
    fn test_seed_defaults_reports_unknown_keys() {
        let mut overrides = BTreeMap::new();
        overrides.insert("oz".to_string(), "60".to_string());
        overrides.insert("zz".to_string(), "1".to_string());
        let (form, unknown) = seed_defaults::<SingleClassInputs>(&overrides);
        assert_eq!(form.optimizable_percent, "60");
        assert_eq!(unknown, vec!["zz".to_string()]);
    }

    #[test]
    fn test_mount_then_first_sync_writes_defaults() {
        let mut sync = ParamSync::mount(PayloadFleetInputs::default(), location("https://calc.example/energy"));
        assert!(sync.sync());
        assert_eq!(
            sync.location().relative(),
            "/energy?sr=50&mr=20&lr=10&xr=2&ec=0.18&h=5000&lt=5"
        );
        // nothing changed, nothing replaced
        assert!(!sync.sync());
        assert_eq!(sync.replacements(), 1);
    }

    #[test]
    fn test_mount_reads_query_once() {
        let mut sync = ParamSync::mount(
            PayloadFleetInputs::default(),
            location("https://calc.example/?sr=8&ref=x#table"),
        );
        assert_eq!(sync.form().small_robots, "8");

        assert!(sync.edit("sr", "9"));
        assert!(sync.sync());
        // later syncs never pull the query back into the form
        assert_eq!(sync.form().small_robots, "9");
        assert_eq!(sync.location().query().get("sr"), Some("9"));
        assert_eq!(sync.location().query().get("ref"), Some("x"));
        assert!(sync.location().as_str().ends_with("#table"));
    }

    #[test]
    fn test_round_trip_through_fresh_mount() {
        let mut first = ParamSync::mount(SingleClassInputs::default(), location("http://localhost/"));
        first.edit("ec", "0,25");
        first.edit("avg", "7.75");
        first.edit("r", "120");
        first.sync();

        let second = ParamSync::mount(SingleClassInputs::default(), first.location().clone());
        assert_eq!(second.form(), first.form());
        assert_eq!(second.form().energy_cost, "0,25");
    }

    #[test]
    fn test_cleared_field_falls_back_to_default_on_reload() {
        let mut first = ParamSync::mount(PayloadFleetInputs::default(), location("http://localhost/?lt=9"));
        assert_eq!(first.form().lifetime_years, "9");
        first.edit("lt", "");
        first.sync();
        assert!(!first.location().query().contains("lt"));

        let second = ParamSync::mount(PayloadFleetInputs::default(), first.location().clone());
        assert_eq!(second.form().lifetime_years, "5");
    }

    #[test]
    fn test_clearing_every_field_drops_the_query() {
        let mut sync = ParamSync::mount(SingleClassInputs::default(), location("http://localhost/calc?ec=1"));
        for key in ["ec", "avg", "r", "h", "oz"] {
            sync.edit(key, "");
        }
        assert!(sync.sync());
        assert_eq!(sync.location().relative(), "/calc");
        assert!(!sync.edit("unknown", "1"));
    }
}
