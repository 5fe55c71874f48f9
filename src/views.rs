//! Plain HTML render functions, one per view. Deliberately unstyled.

use axum::response::Html;

use crate::models::{Marks, StudentRecord};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title></head>\
         <body>{}</body></html>",
        escape(title),
        body
    ))
}

fn error_line(error: Option<&str>) -> String {
    match error {
        Some(message) => format!("<p class=\"error\">{}</p>", escape(message)),
        None => String::new(),
    }
}

pub fn login_page(error: Option<&str>) -> Html<String> {
    page(
        "Login",
        &format!(
            "<h1>Login</h1>{}\
             <form method=\"post\" action=\"/login\">\
             <label>Username: <input name=\"username\"></label>\
             <label>Password: <input name=\"password\" type=\"password\"></label>\
             <button type=\"submit\">Login</button></form>\
             <p><a href=\"/register\">Register</a></p>",
            error_line(error)
        ),
    )
}

pub fn register_page(error: Option<&str>) -> Html<String> {
    page(
        "Register",
        &format!(
            "<h1>Register</h1>{}\
             <form method=\"post\" action=\"/register\">\
             <label>Username: <input name=\"username\"></label>\
             <label>Password: <input name=\"password\" type=\"password\"></label>\
             <button type=\"submit\">Register</button></form>\
             <p><a href=\"/login\">Login</a></p>",
            error_line(error)
        ),
    )
}

pub fn dashboard_page(students: &[StudentRecord]) -> Html<String> {
    let mut rows = String::new();
    for student in students {
        rows.push_str(&format!(
            "<tr><td>{id}</td><td>{name}</td><td>{grade}</td><td>{total}</td><td>\
             <a href=\"/student_profile/{id}\">profile</a> \
             <a href=\"/add_marks/{id}\">marks</a> \
             <a href=\"/edit_student/{id}\">edit</a> \
             <a href=\"/print_marksheet/{id}\">mark sheet</a> \
             <a href=\"/delete_student/{id}\">delete</a></td></tr>",
            id = student.id,
            name = escape(&student.name),
            grade = escape(&student.grade),
            total = student.marks().total(),
        ));
    }
    page(
        "Dashboard",
        &format!(
            "<h1>Students</h1>\
             <p><a href=\"/add_student\">Add student</a> <a href=\"/logout\">Logout</a></p>\
             <table><tr><th>Id</th><th>Name</th><th>Grade</th><th>Total</th><th></th></tr>\
             {}</table>",
            rows
        ),
    )
}

pub fn add_student_page(error: Option<&str>) -> Html<String> {
    page(
        "Add Student",
        &format!(
            "<h1>Add Student</h1>{}",
            student_form("/add_student", None, error)
        ),
    )
}

pub fn edit_student_page(student: &StudentRecord, error: Option<&str>) -> Html<String> {
    page(
        "Edit Student",
        &format!(
            "<h1>Edit {}</h1>{}",
            escape(&student.name),
            student_form(
                &format!("/edit_student/{}", student.id),
                Some(student),
                error
            )
        ),
    )
}

pub fn add_marks_page(student: &StudentRecord, error: Option<&str>) -> Html<String> {
    let marks = student.marks();
    page(
        "Add Marks",
        &format!(
            "<h1>Marks for {name}</h1>{err}\
             <form method=\"post\" action=\"/add_marks/{id}\">\
             {scores}<button type=\"submit\">Save</button></form>",
            name = escape(&student.name),
            err = error_line(error),
            id = student.id,
            scores = score_inputs(Some(&marks)),
        ),
    )
}

pub fn profile_page(student: &StudentRecord) -> Html<String> {
    page(
        "Student Profile",
        &format!(
            "<h1>{name}</h1>\
             <dl><dt>Grade</dt><dd>{grade}</dd>\
             <dt>Email</dt><dd>{email}</dd>\
             <dt>Phone</dt><dd>{phone}</dd></dl>\
             <p><a href=\"/print_marksheet/{id}\">Mark sheet</a> \
             <a href=\"/dashboard\">Back</a></p>",
            name = escape(&student.name),
            grade = escape(&student.grade),
            email = escape(&student.email),
            phone = escape(&student.phone),
            id = student.id,
        ),
    )
}

pub fn marksheet_page(student: &StudentRecord) -> Html<String> {
    let marks = student.marks();
    page(
        "Mark Sheet",
        &format!(
            "<h1>Mark Sheet</h1>\
             <p>{name} &mdash; Grade {grade}</p>\
             <table>\
             <tr><th>Subject</th><th>Score</th></tr>\
             <tr><td>Maths</td><td>{maths}</td></tr>\
             <tr><td>Science</td><td>{science}</td></tr>\
             <tr><td>English</td><td>{english}</td></tr>\
             <tr><td>Hindi</td><td>{hindi}</td></tr>\
             <tr><td>Computer</td><td>{computer}</td></tr>\
             <tr><th>Total</th><th>{total}</th></tr>\
             <tr><th>Average</th><th>{average:.1}</th></tr>\
             </table>\
             <p><a href=\"/dashboard\">Back</a></p>",
            name = escape(&student.name),
            grade = escape(&student.grade),
            maths = marks.maths,
            science = marks.science,
            english = marks.english,
            hindi = marks.hindi,
            computer = marks.computer,
            total = marks.total(),
            average = marks.average(),
        ),
    )
}

pub fn not_found_page(detail: &str) -> Html<String> {
    page(
        "Not Found",
        &format!("<h1>Not Found</h1><p>{}</p>", escape(detail)),
    )
}

pub fn error_page(detail: &str) -> Html<String> {
    page("Error", &format!("<h1>Error</h1><p>{}</p>", escape(detail)))
}

fn student_form(action: &str, current: Option<&StudentRecord>, error: Option<&str>) -> String {
    let marks = current.map(|s| s.marks());
    let text = |value: Option<&str>| value.map(escape).unwrap_or_default();
    format!(
        "{err}<form method=\"post\" action=\"{action}\">\
         <label>Name: <input name=\"name\" value=\"{name}\"></label>\
         <label>Grade: <input name=\"grade\" value=\"{grade}\"></label>\
         {scores}\
         <label>Email: <input name=\"email\" value=\"{email}\"></label>\
         <label>Phone: <input name=\"phone\" value=\"{phone}\"></label>\
         <button type=\"submit\">Save</button></form>",
        err = error_line(error),
        action = action,
        name = text(current.map(|s| s.name.as_str())),
        grade = text(current.map(|s| s.grade.as_str())),
        scores = score_inputs(marks.as_ref()),
        email = text(current.map(|s| s.email.as_str())),
        phone = text(current.map(|s| s.phone.as_str())),
    )
}

fn score_inputs(current: Option<&Marks>) -> String {
    let value = |pick: fn(&Marks) -> i64| {
        current.map(|m| pick(m).to_string()).unwrap_or_default()
    };
    format!(
        "<label>Maths: <input name=\"maths\" value=\"{}\"></label>\
         <label>Science: <input name=\"science\" value=\"{}\"></label>\
         <label>English: <input name=\"english\" value=\"{}\"></label>\
         <label>Hindi: <input name=\"hindi\" value=\"{}\"></label>\
         <label>Computer: <input name=\"computer\" value=\"{}\"></label>",
        value(|m| m.maths),
        value(|m| m.science),
        value(|m| m.english),
        value(|m| m.hindi),
        value(|m| m.computer),
    )
}
