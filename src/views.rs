//! Minimal server-rendered HTML pages.
//!
//! The markup is deliberately plain: the interesting surface of the
//! application is the data and the JSON API, and every page here is small
//! enough to build by hand. Form pages re-render with field messages when
//! a submission fails validation.

use axum::response::Html;
use model::entities::{cafe, city, user};

use crate::handlers::auth::{LoginForm, SignupForm};
use crate::handlers::cafes::CafeForm;
use crate::handlers::profile::ProfileForm;

/// Escape text interpolated into HTML.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{} | CafeHub</title></head>\n<body>\n\
         <nav><a href=\"/\">CafeHub</a> | <a href=\"/cafes\">Cafes</a> | <a href=\"/profile\">Profile</a> | \
         <a href=\"/login\">Log in</a> | <a href=\"/signup\">Sign up</a></nav>\n<h1>{}</h1>\n{}\n</body>\n</html>",
        escape(title),
        escape(title),
        body,
    ))
}

fn errors_block(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape(e)))
        .collect();
    format!("<ul class=\"form-errors\">{items}</ul>")
}

fn text_input(label: &str, name: &str, value: &str) -> String {
    format!(
        "<p><label>{label} <input type=\"text\" name=\"{name}\" value=\"{}\"></label></p>",
        escape(value),
    )
}

fn password_input(label: &str, name: &str) -> String {
    format!("<p><label>{label} <input type=\"password\" name=\"{name}\"></label></p>")
}

pub fn homepage() -> Html<String> {
    layout(
        "Welcome",
        "<p>Find a cafe worth sitting down in. Browse the <a href=\"/cafes\">directory</a>.</p>",
    )
}

pub fn not_found_page() -> Html<String> {
    layout("Page not found", "<p>There is nothing at this address.</p>")
}

pub fn cafe_list_page(cafes: &[cafe::Model]) -> Html<String> {
    let items: String = cafes
        .iter()
        .map(|cafe| {
            format!(
                "<li><a href=\"/cafes/{}\">{}</a></li>",
                cafe.id,
                escape(&cafe.name),
            )
        })
        .collect();
    layout("Cafes", &format!("<ul>{items}</ul>"))
}

pub fn cafe_detail_page(cafe: &cafe::Model, city: &city::Model) -> Html<String> {
    let body = format!(
        "<p>{}</p>\n<p>{} ({})</p>\n<p><a href=\"{}\">{}</a></p>\n\
         <img src=\"{}\" alt=\"{}\">\n<img src=\"/static/maps/{}.jpg\" alt=\"map\">",
        escape(&cafe.description),
        escape(&cafe.address),
        escape(&city.city_state()),
        escape(&cafe.url),
        escape(&cafe.url),
        escape(&cafe.image_url),
        escape(&cafe.name),
        cafe.id,
    );
    layout(&cafe.name, &body)
}

pub fn cafe_form_page(
    title: &str,
    action: &str,
    form: &CafeForm,
    cities: &[city::Model],
    errors: &[String],
) -> Html<String> {
    let options: String = cities
        .iter()
        .map(|city| {
            let selected = if city.code == form.city_code {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{}\"{selected}>{}</option>",
                escape(&city.code),
                escape(&city.name),
            )
        })
        .collect();

    let body = format!(
        "{}<form method=\"post\" action=\"{action}\">\n{}{}{}{}\
         <p><label>City <select name=\"city_code\">{options}</select></label></p>\n{}\
         <p><button type=\"submit\">Save</button></p>\n</form>",
        errors_block(errors),
        text_input("Name", "name", &form.name),
        text_input("Description", "description", &form.description),
        text_input("URL", "url", &form.url),
        text_input("Address", "address", &form.address),
        text_input("Image URL", "image_url", form.image_url.as_deref().unwrap_or("")),
    );
    layout(title, &body)
}

pub fn signup_page(form: &SignupForm, errors: &[String]) -> Html<String> {
    let body = format!(
        "{}<form method=\"post\" action=\"/signup\">\n{}{}{}{}{}{}{}\
         <p><button type=\"submit\">Sign up</button></p>\n</form>",
        errors_block(errors),
        text_input("Username", "username", &form.username),
        text_input("First name", "first_name", &form.first_name),
        text_input("Last name", "last_name", &form.last_name),
        text_input("Description", "description", form.description.as_deref().unwrap_or("")),
        text_input("Email", "email", &form.email),
        password_input("Password", "password"),
        text_input("Image URL", "image_url", form.image_url.as_deref().unwrap_or("")),
    );
    layout("Sign up", &body)
}

pub fn login_page(form: &LoginForm, errors: &[String]) -> Html<String> {
    let body = format!(
        "{}<form method=\"post\" action=\"/login\">\n{}{}\
         <p><button type=\"submit\">Log in</button></p>\n</form>",
        errors_block(errors),
        text_input("Username", "username", &form.username),
        password_input("Password", "password"),
    );
    layout("Log in", &body)
}

pub fn profile_page(user: &user::Model) -> Html<String> {
    let body = format!(
        "<p>{} (@{})</p>\n<p>{}</p>\n<p>{}</p>\n\
         <p><a href=\"/profile/edit\">Edit profile</a></p>\n\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Log out</button></form>",
        escape(&user.full_name()),
        escape(&user.username),
        escape(&user.email),
        escape(user.description.as_deref().unwrap_or("")),
    );
    layout("Your profile", &body)
}

pub fn profile_edit_page(form: &ProfileForm, errors: &[String]) -> Html<String> {
    let body = format!(
        "{}<form method=\"post\" action=\"/profile/edit\">\n{}{}{}{}{}\
         <p><button type=\"submit\">Save</button></p>\n</form>",
        errors_block(errors),
        text_input("First name", "first_name", &form.first_name),
        text_input("Last name", "last_name", &form.last_name),
        text_input("Description", "description", form.description.as_deref().unwrap_or("")),
        text_input("Email", "email", &form.email),
        text_input("Image URL", "image_url", form.image_url.as_deref().unwrap_or("")),
    );
    layout("Edit profile", &body)
}
