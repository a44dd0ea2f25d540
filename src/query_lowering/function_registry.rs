/// Builder function registry
///
/// Maps the function names accepted by `Expr::Call` to SurrealQL functions, with the
/// number of arguments each one takes.
use std::collections::HashMap;

/// How the call is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStyle {
    /// `name(a, b)`
    Function,
    /// `a.name(b)`, first argument is the receiver
    Method,
}

/// Function mapping entry
#[derive(Debug, Clone)]
pub struct FunctionMapping {
    pub builder_name: &'static str,
    pub surql_name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    pub style: CallStyle,
}

impl FunctionMapping {
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && count <= self.max_args
    }
}

/// Get function mapping for a builder function name
pub fn get_function_mapping(name: &str) -> Option<FunctionMapping> {
    FUNCTION_MAPPINGS.get(name).cloned()
}

fn insert(
    m: &mut HashMap<&'static str, FunctionMapping>,
    builder_name: &'static str,
    surql_name: &'static str,
    args: (usize, usize),
    style: CallStyle,
) {
    m.insert(
        builder_name,
        FunctionMapping {
            builder_name,
            surql_name,
            min_args: args.0,
            max_args: args.1,
            style,
        },
    );
}

fn function(m: &mut HashMap<&'static str, FunctionMapping>, name: &'static str, args: (usize, usize)) {
    insert(m, name, name, args, CallStyle::Function);
}

// Static function mapping table
lazy_static::lazy_static! {
    static ref FUNCTION_MAPPINGS: HashMap<&'static str, FunctionMapping> = {
        let mut m = HashMap::new();

        // ===== STRING FUNCTIONS =====
        function(&mut m, "string::contains", (2, 2));
        function(&mut m, "string::starts_with", (2, 2));
        function(&mut m, "string::ends_with", (2, 2));
        function(&mut m, "string::concat", (1, usize::MAX));
        function(&mut m, "string::replace", (3, 3));
        function(&mut m, "string::split", (2, 2));
        function(&mut m, "string::trim", (1, 1));
        function(&mut m, "string::lowercase", (1, 1));
        function(&mut m, "string::uppercase", (1, 1));
        function(&mut m, "string::slice", (1, 3));
        function(&mut m, "string::words", (1, 1));
        function(&mut m, "string::len", (1, 1));
        function(&mut m, "string::is_empty", (1, 1));

        // ===== MATH FUNCTIONS =====
        for name in [
            "math::abs", "math::acos", "math::asin", "math::atan", "math::ceil", "math::cos",
            "math::floor", "math::log10", "math::log2", "math::sign", "math::sin", "math::sqrt",
            "math::tan", "math::sum", "math::mean",
        ] {
            function(&mut m, name, (1, 1));
        }
        // math::log(x) uses base e, math::log(x, base) an explicit base
        function(&mut m, "math::log", (1, 2));
        function(&mut m, "math::round", (1, 1));
        function(&mut m, "math::clamp", (3, 3));
        function(&mut m, "math::pow", (2, 2));
        function(&mut m, "math::max", (1, 2));
        function(&mut m, "math::min", (1, 2));

        // ===== ARRAY FUNCTIONS =====
        for name in [
            "array::len", "array::distinct", "array::first", "array::last", "array::max",
            "array::min", "array::reverse", "array::is_empty", "array::flatten",
        ] {
            function(&mut m, name, (1, 1));
        }
        for name in [
            "array::append", "array::prepend", "array::at", "array::clump", "array::concat",
            "array::difference", "array::intersect", "array::join", "array::repeat",
            "array::union",
        ] {
            function(&mut m, name, (2, 2));
        }
        function(&mut m, "array::slice", (2, 3));
        insert(&mut m, "array::sort_asc", "array::sort::asc", (1, 1), CallStyle::Function);
        insert(&mut m, "array::sort_desc", "array::sort::desc", (1, 1), CallStyle::Function);

        // ===== TIME FUNCTIONS =====
        function(&mut m, "time::now", (0, 0));
        function(&mut m, "time::floor", (2, 2));
        insert(&mut m, "time::from_unix", "time::from::unix", (1, 1), CallStyle::Function);
        // Datetime members print as methods: time::now().year()
        for (builder_name, method) in [
            ("time::year", "year"),
            ("time::month", "month"),
            ("time::day", "day"),
            ("time::hour", "hour"),
            ("time::minute", "minute"),
            ("time::second", "second"),
            ("time::yday", "yday"),
        ] {
            insert(&mut m, builder_name, method, (1, 1), CallStyle::Method);
        }

        // ===== DURATION FUNCTIONS =====
        insert(&mut m, "duration::from_nanos", "duration::from::nanos", (1, 1), CallStyle::Function);

        // ===== VECTOR FUNCTIONS =====
        for name in [
            "vector::add", "vector::cross", "vector::divide", "vector::dot", "vector::multiply",
            "vector::scale", "vector::subtract",
        ] {
            function(&mut m, name, (2, 2));
        }
        function(&mut m, "vector::normalize", (1, 1));
        insert(
            &mut m,
            "vector::distance_euclidean",
            "vector::distance::euclidean",
            (2, 2),
            CallStyle::Function,
        );

        m
    };
}
