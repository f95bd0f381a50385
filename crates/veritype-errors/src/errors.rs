//! The error accumulator: collects diagnostics with their import context and
//! renders them into stable, de-duplicated output lines.

use veritype_common::{DiagnosticCategory, DiagnosticKind, Line};

/// One generated diagnostic, with the context it was reported under.
#[derive(Clone, Debug)]
pub struct ErrorInfo {
    pub import_ctx: Vec<(String, Line)>,
    pub file: String,
    /// Unqualified name of the class/interface the error is located in.
    pub type_name: Option<String>,
    pub is_interface: bool,
    /// Unqualified name of the function or member the error is located in.
    pub function_or_member: Option<String>,
    pub line: Line,
    pub message: String,
    pub kind: DiagnosticKind,
    pub category: DiagnosticCategory,
}

impl ErrorInfo {
    fn type_id(&self) -> &'static str {
        if self.is_interface {
            "interface"
        } else {
            "class"
        }
    }
}

/// Tracks the current error context (file, enclosing class/function, import
/// chain) and accumulates diagnostics reported against it.
#[derive(Default)]
pub struct Errors {
    error_info: Vec<ErrorInfo>,
    import_ctx: Vec<(String, Line)>,
    ignore_prefix: Option<String>,
    file: String,
    type_name: Option<String>,
    is_interface: bool,
    function_or_member: Option<String>,
    /// Incremented while checking speculatively (e.g. the context-free first
    /// pass over lambda arguments, or overload matching); `report` is a
    /// no-op while this is above zero. Decremented on every exit path by
    /// the caller, including early returns.
    disable_count: i32,
}

impl Errors {
    pub fn new() -> Self {
        Errors::default()
    }

    pub fn set_ignore_prefix(&mut self, prefix: impl Into<String>) {
        let mut prefix = prefix.into();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.ignore_prefix = Some(prefix);
    }

    pub fn set_file(&mut self, file: impl Into<String>) {
        let file = file.into();
        self.file = remove_path_prefix(&file, self.ignore_prefix.as_deref()).to_string();
    }

    pub fn set_function(&mut self, name: Option<String>) {
        self.function_or_member = name;
    }

    pub fn set_type(&mut self, name: Option<String>, is_interface: bool) {
        self.type_name = name;
        self.is_interface = is_interface;
    }

    pub fn push_import_context(&mut self, path: impl Into<String>, line: Line) {
        self.import_ctx.push((path.into(), line));
    }

    pub fn pop_import_context(&mut self) {
        self.import_ctx.pop();
    }

    pub fn import_context(&self) -> Vec<(String, Line)> {
        self.import_ctx.clone()
    }

    pub fn set_import_context(&mut self, ctx: Vec<(String, Line)>) {
        self.import_ctx = ctx;
    }

    pub fn disable_errors(&mut self) {
        self.disable_count += 1;
    }

    pub fn enable_errors(&mut self) {
        self.disable_count -= 1;
    }

    pub fn is_reporting(&self) -> bool {
        self.disable_count <= 0
    }

    /// Report a message at `line` using the current error context. A no-op
    /// while speculative checking has disabled reporting.
    pub fn report(&mut self, line: Line, message: impl Into<String>, kind: DiagnosticKind, category: DiagnosticCategory) {
        if !self.is_reporting() {
            return;
        }
        self.error_info.push(ErrorInfo {
            import_ctx: self.import_context(),
            file: self.file.clone(),
            type_name: self.type_name.clone(),
            is_interface: self.is_interface,
            function_or_member: self.function_or_member.clone(),
            line,
            message: message.into(),
            kind,
            category,
        });
    }

    pub fn num_messages(&self) -> usize {
        self.error_info.len()
    }

    pub fn is_errors(&self) -> bool {
        self.error_info
            .iter()
            .any(|e| matches!(e.category, DiagnosticCategory::Error))
    }

    /// Render accumulated diagnostics into display-ready lines: sorted,
    /// context-annotated, and de-duplicated.
    pub fn messages(&self) -> Vec<String> {
        let sorted = sort_messages(self.error_info.clone());
        let rendered = self.render_messages(&sorted);
        let deduped = remove_duplicates(rendered);
        deduped
            .into_iter()
            .map(|(file, line, message)| match file {
                Some(file) if line.is_known() => format!("{file}, line {}: {message}", line.0),
                Some(file) => format!("{file}: {message}"),
                None => message,
            })
            .collect()
    }

    fn render_messages(&self, errors: &[ErrorInfo]) -> Vec<(Option<String>, Line, String)> {
        let mut result = Vec::new();
        let mut prev_import_context: Vec<(String, Line)> = Vec::new();
        let mut prev_function_or_member: Option<String> = None;
        let mut prev_type: Option<String> = None;

        for e in errors {
            if e.import_ctx != prev_import_context {
                let last = e.import_ctx.len().saturating_sub(1);
                for (i, (path, line)) in e.import_ctx.iter().enumerate().rev() {
                    let path = remove_path_prefix(path, self.ignore_prefix.as_deref());
                    let lead = if i < last {
                        "                   in"
                    } else {
                        "In module imported in"
                    };
                    let tail = if i > 0 { "," } else { ":" };
                    result.push((None, Line::UNKNOWN, format!("{lead} {path}, line {}{tail}", line.0)));
                }
            }

            if e.function_or_member != prev_function_or_member || e.typ_changed(&prev_type) {
                match (&e.function_or_member, &e.type_name) {
                    (None, None) => result.push((Some(e.file.clone()), Line::UNKNOWN, "At top level:".to_string())),
                    (None, Some(typ)) => result.push((
                        Some(e.file.clone()),
                        Line::UNKNOWN,
                        format!("In {} \"{typ}\":", e.type_id()),
                    )),
                    (Some(func), None) => result.push((
                        Some(e.file.clone()),
                        Line::UNKNOWN,
                        format!("In function \"{func}\":"),
                    )),
                    (Some(func), Some(typ)) => result.push((
                        Some(e.file.clone()),
                        Line::UNKNOWN,
                        format!("In member \"{func}\" of {} \"{typ}\":", e.type_id()),
                    )),
                }
            }

            result.push((Some(e.file.clone()), e.line, e.message.clone()));

            prev_import_context = e.import_ctx.clone();
            prev_function_or_member = e.function_or_member.clone();
            prev_type = e.type_name.clone();
        }

        result
    }
}

impl ErrorInfo {
    fn typ_changed(&self, prev_type: &Option<String>) -> bool {
        &self.type_name != prev_type
    }
}

/// Stable-sort a run of consecutive messages sharing the same import
/// context and file by line number, leaving the overall message ordering
/// (and ordering between different contexts) intact.
fn sort_messages(errors: Vec<ErrorInfo>) -> Vec<ErrorInfo> {
    let mut result = Vec::with_capacity(errors.len());
    let mut i = 0;
    while i < errors.len() {
        let i0 = i;
        while i + 1 < errors.len()
            && errors[i + 1].import_ctx == errors[i].import_ctx
            && errors[i + 1].file == errors[i].file
        {
            i += 1;
        }
        i += 1;
        let mut run: Vec<ErrorInfo> = errors[i0..i].to_vec();
        run.sort_by_key(|e| e.line);
        result.extend(run);
    }
    result
}

/// Remove duplicates from an already-sorted render: an identical
/// `(file, line, message)` triple adjacent to (or within the same
/// file-context run as) an earlier one is dropped.
fn remove_duplicates(errors: Vec<(Option<String>, Line, String)>) -> Vec<(Option<String>, Line, String)> {
    let mut res: Vec<(Option<String>, Line, String)> = Vec::with_capacity(errors.len());
    for (i, entry) in errors.iter().enumerate() {
        let mut dup = false;
        let mut j = i as isize - 1;
        while j >= 0 {
            let prev = &errors[j as usize];
            if prev.0 != entry.0 || prev.1 != entry.1 {
                break;
            }
            if prev == entry {
                dup = true;
                break;
            }
            j -= 1;
        }
        if !dup {
            res.push(entry.clone());
        }
    }
    res
}

fn remove_path_prefix<'a>(path: &'a str, prefix: Option<&str>) -> &'a str {
    match prefix {
        Some(prefix) if path.starts_with(prefix) => &path[prefix.len()..],
        _ => path,
    }
}
