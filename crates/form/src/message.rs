//! Error message templates
//!
//! Templates use `%s` placeholders, filled left to right. The first is
//! always the field label; operations that compare against an argument
//! (such as `equals`) supply it as the second.

/// Fills `%s` placeholders in `template` with `args`, in order.
///
/// Placeholders beyond the supplied arguments are left untouched.
///
/// # Examples
///
/// ```rust
/// use nebula_form::message::render;
///
/// assert_eq!(render("%s is required", &["email"]), "email is required");
/// assert_eq!(
///     render("%s does not equal %s", &["confirm", "password"]),
///     "confirm does not equal password",
/// );
/// ```
pub fn render(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut args = args.iter();
    let mut rest = template;

    while let Some(pos) = rest.find("%s") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("%s"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}
