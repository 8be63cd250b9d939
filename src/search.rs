use crate::app::{AppState, Pane};
use crate::roster::{SearchField, StudentRecord};

/// Run the pending search (`app.search_field` / `app.search_query`) and show the hits.
///
/// Matching is exact and case-sensitive. An empty result is reported in the
/// results pane and on the status line.
pub fn apply_search(app: &mut AppState) {
    let field = app.search_field;
    let q = app.search_query.as_str();
    let records: Vec<StudentRecord> = app.roster.find(field, q).into_iter().cloned().collect();

    let heading = if records.is_empty() {
        let what = match field {
            SearchField::Id => "ID",
            SearchField::Name => "Student's name",
            SearchField::Account => "Account",
        };
        format!("{what} '{q}' is not on the list!")
    } else {
        let who = if field == SearchField::Name { "student(s)" } else { "student" };
        format!("Information of {who} having {} '{q}':", field.label())
    };
    app.status = if records.is_empty() {
        heading.clone()
    } else {
        format!("Found {} matching record(s)", records.len())
    };
    app.pane = Pane::Results { heading, records };
}
