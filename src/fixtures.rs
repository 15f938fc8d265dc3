#[cfg(test)]
pub mod test {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::LazyLock;
    use std::time::Duration;

    use crate::bind::ParsedFlags;
    use crate::merge::merge_maps;
    use crate::resource::Resource;
    use crate::schema::{Accessor, FieldDescriptor, Schema};

    /// One field of every kind the synthesizer accepts, plus an undocumented one.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct SampleConfig {
        pub verbose: bool,
        pub name: String,
        pub peers: Vec<String>,
        pub labels: BTreeMap<String, String>,
        pub rules: Vec<Resource>,
        pub workers: i64,
        pub timeout: Duration,
        pub secret: String,
    }

    static SAMPLE_FIELDS: LazyLock<Vec<FieldDescriptor<SampleConfig>>> = LazyLock::new(|| {
        vec![
            FieldDescriptor::<SampleConfig>::new(
                "verbose",
                "verbose",
                Accessor::Bool {
                    get: |c| c.verbose,
                    set: |c, v| c.verbose = v,
                },
            )
            .usage("print more output"),
            FieldDescriptor::<SampleConfig>::new(
                "name",
                "name",
                Accessor::Str {
                    get: |c| c.name.as_str(),
                    set: |c, v| c.name = v,
                },
            )
            .usage("the service name")
            .env("NAME"),
            FieldDescriptor::<SampleConfig>::new(
                "peers",
                "peers",
                Accessor::StrList {
                    set: |c, v| c.peers = v,
                },
            )
            .usage("peer addresses"),
            FieldDescriptor::<SampleConfig>::new(
                "labels",
                "labels",
                Accessor::StrMap {
                    merge: |c, pairs| merge_maps(&mut c.labels, pairs),
                },
            )
            .usage("labels as key=value"),
            FieldDescriptor::<SampleConfig>::new(
                "rules",
                "rules",
                Accessor::ResourceList {
                    append: |c, rules| c.rules.extend(rules),
                },
            )
            .usage("authorization rules"),
            FieldDescriptor::<SampleConfig>::new(
                "workers",
                "workers",
                Accessor::Integer {
                    set: |c, v| c.workers = v,
                },
            )
            .usage("number of workers")
            .env("WORKERS"),
            FieldDescriptor::<SampleConfig>::new(
                "timeout",
                "timeout",
                Accessor::Duration {
                    get: |c| c.timeout,
                    set: |c, v| c.timeout = v,
                },
            )
            .usage("request timeout")
            .env("TIMEOUT"),
            FieldDescriptor::<SampleConfig>::new(
                "secret",
                "secret",
                Accessor::Str {
                    get: |c| c.secret.as_str(),
                    set: |c, v| c.secret = v,
                },
            ),
        ]
    });

    impl Schema for SampleConfig {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            &SAMPLE_FIELDS
        }
    }

    // -- Fixtures for schema/synthesizer drift -------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct Int64Config {
        pub max_bytes: i64,
    }

    static INT64_FIELDS: LazyLock<Vec<FieldDescriptor<Int64Config>>> = LazyLock::new(|| {
        vec![
            FieldDescriptor::<Int64Config>::new(
                "max_bytes",
                "max-bytes",
                Accessor::Int64 {
                    type_name: "ByteSize",
                    set: |c, v| c.max_bytes = v,
                },
            )
            .usage("largest accepted body"),
        ]
    });

    impl Schema for Int64Config {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            &INT64_FIELDS
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct OtherConfig {
        pub ratio: f64,
    }

    static OTHER_FIELDS: LazyLock<Vec<FieldDescriptor<OtherConfig>>> = LazyLock::new(|| {
        vec![
            FieldDescriptor::<OtherConfig>::new("ratio", "ratio", Accessor::Other { type_name: "f64" })
                .usage("sampling ratio"),
        ]
    });

    impl Schema for OtherConfig {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            &OTHER_FIELDS
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct HiddenOtherConfig {
        pub ratio: f64,
    }

    static HIDDEN_OTHER_FIELDS: LazyLock<Vec<FieldDescriptor<HiddenOtherConfig>>> =
        LazyLock::new(|| {
            vec![FieldDescriptor::<HiddenOtherConfig>::new(
                "ratio",
                "ratio",
                Accessor::Other { type_name: "f64" },
            )]
        });

    impl Schema for HiddenOtherConfig {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            &HIDDEN_OTHER_FIELDS
        }
    }

    // -- In-memory parsed flags ------------------------------------------------

    #[derive(Debug, Clone)]
    pub enum FlagValue {
        Bool(bool),
        Str(String),
        List(Vec<String>),
        Int(i64),
        Duration(Duration),
    }

    /// Stand-in for a parsed command line: a flag is "set" iff it has a value.
    #[derive(Debug, Clone, Default)]
    pub struct FakeFlags {
        values: HashMap<String, FlagValue>,
    }

    impl FakeFlags {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, name: &str, value: FlagValue) -> Self {
            self.values.insert(name.to_string(), value);
            self
        }

        pub fn list(self, name: &str, values: &[&str]) -> Self {
            let values = values.iter().map(|s| s.to_string()).collect();
            self.with(name, FlagValue::List(values))
        }
    }

    impl ParsedFlags for FakeFlags {
        fn is_set(&self, name: &str) -> bool {
            self.values.contains_key(name)
        }

        fn bool(&self, name: &str) -> bool {
            matches!(self.values.get(name), Some(FlagValue::Bool(true)))
        }

        fn string(&self, name: &str) -> String {
            match self.values.get(name) {
                Some(FlagValue::Str(s)) => s.clone(),
                _ => String::new(),
            }
        }

        fn string_list(&self, name: &str) -> Vec<String> {
            match self.values.get(name) {
                Some(FlagValue::List(v)) => v.clone(),
                _ => Vec::new(),
            }
        }

        fn int(&self, name: &str) -> i64 {
            match self.values.get(name) {
                Some(FlagValue::Int(i)) => *i,
                _ => 0,
            }
        }

        fn duration(&self, name: &str) -> Duration {
            match self.values.get(name) {
                Some(FlagValue::Duration(d)) => *d,
                _ => Duration::ZERO,
            }
        }
    }
}
