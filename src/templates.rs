use maud::{DOCTYPE, Markup, html};

use crate::{
    models::{Movie, MovieKind, PageRequest},
    validator::ValidationErrors,
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    pub fn from_param(level: Option<&str>) -> Self {
        match level {
            Some("error") => NoticeLevel::Error,
            _ => NoticeLevel::Success,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        }
    }
}

/// A one-shot banner shown after an action.
#[derive(Clone, Debug)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

pub struct ListView<'a> {
    pub movies: Vec<&'a Movie>,
    pub query: &'a str,
    pub page: PageRequest,
    pub total: u64,
    pub total_pages: u64,
    pub notice: Option<Notice>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormMode {
    Add,
    Edit(i32),
}

/// The add/edit form. Values are kept as the raw strings the user typed.
pub struct MovieForm<'a> {
    pub mode: FormMode,
    pub values: &'a std::collections::HashMap<String, String>,
    pub errors: Option<&'a ValidationErrors>,
}

pub fn index_page(view: &ListView<'_>) -> String {
    page(
        "Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-5xl mx-auto px-6 py-10" {
                    @if let Some(notice) = &view.notice {
                        (notice_banner(notice))
                    }

                    div class="flex items-start justify-between gap-6" {
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { "Movies" }
                            p class="mt-2 text-gray-600" { "Total: " (view.total) }
                        }
                        a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/ui/movies/new" { "Add movie" }
                    }

                    form class="mt-6" method="get" action="/" {
                        input type="hidden" name="limit" value=(view.page.limit);
                        input class="w-full rounded-md border border-gray-300 px-3 py-2" type="search" name="q" placeholder="Search movies..." value=(view.query);
                    }

                    @if view.movies.is_empty() {
                        div class="mt-8 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No movies found." }
                        }
                    } @else {
                        table class="mt-8 w-full bg-white shadow rounded-lg text-sm" {
                            thead {
                                tr class="text-left text-gray-500" {
                                    th class="p-3" { "Title" }
                                    th class="p-3" { "Type" }
                                    th class="p-3" { "Director" }
                                    th class="p-3" { "Budget" }
                                    th class="p-3" { "Location" }
                                    th class="p-3" { "Duration" }
                                    th class="p-3" { "Year" }
                                    th class="p-3" {}
                                }
                            }
                            tbody {
                                @for movie in &view.movies {
                                    (movie_row(movie))
                                }
                            }
                        }
                    }

                    (pagination(view))
                }
            }
        },
    )
}

pub fn form_page(form: &MovieForm<'_>, notice: Option<&Notice>) -> String {
    let (heading, action, submit) = match form.mode {
        FormMode::Add => ("Add movie".to_string(), "/ui/movies".to_string(), "Add"),
        FormMode::Edit(id) => (format!("Edit movie #{id}"), format!("/ui/movies/{id}"), "Save"),
    };
    let selected_kind = form.values.get("type").map(String::as_str).unwrap_or_default();

    page(
        &heading,
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    @if let Some(notice) = notice {
                        (notice_banner(notice))
                    }
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { (heading) }

                        form class="mt-8 space-y-6" method="post" action=(action) {
                            (text_field(form, "title", "Title", "text"))

                            div {
                                label class="block text-sm font-medium text-gray-700" for="type" { "Type" }
                                select class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" name="type" id="type" {
                                    option value="" selected[selected_kind.is_empty()] { "Select type" }
                                    @for kind in MovieKind::ALL {
                                        option value=(kind.as_str()) selected[selected_kind == kind.as_str()] { (kind_label(kind)) }
                                    }
                                }
                                (field_error(form, "type"))
                            }

                            (text_field(form, "director", "Director", "text"))
                            (text_field(form, "budget", "Budget", "number"))
                            (text_field(form, "location", "Location", "text"))
                            (text_field(form, "duration", "Duration", "text"))
                            (text_field(form, "year", "Year", "number"))

                            div class="flex gap-4" {
                                button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { (submit) }
                                a class="px-4 py-2 text-gray-600 hover:text-gray-900" href="/" { "Cancel" }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn confirm_delete_page(movie: &Movie) -> String {
    page(
        "Delete movie",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Delete movie" }
                        p class="mt-4 text-gray-700" {
                            "Are you sure you want to delete "
                            span class="font-semibold" { (movie.title) }
                            " (" (movie.year) ")?"
                        }
                        form class="mt-6 flex gap-4" method="post" action=(format!("/ui/movies/{}/delete", movie.id)) {
                            button class="rounded-md bg-red-600 px-4 py-2 font-semibold text-white hover:bg-red-700" type="submit" { "Delete" }
                            a class="px-4 py-2 text-gray-600 hover:text-gray-900" href="/" { "Cancel" }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn notice_banner(notice: &Notice) -> Markup {
    let class = match notice.level {
        NoticeLevel::Success => "mb-6 rounded-md border border-green-300 bg-green-50 px-4 py-3 text-green-800",
        NoticeLevel::Error => "mb-6 rounded-md border border-red-300 bg-red-50 px-4 py-3 text-red-800",
    };
    html! {
        div id="notice" class=(class) role="status" { (notice.message) }
    }
}

fn movie_row(movie: &Movie) -> Markup {
    html! {
        tr class="border-t border-gray-100" {
            td class="p-3 font-medium text-gray-900" { (movie.title) }
            td class="p-3" { (kind_label(movie.kind)) }
            td class="p-3" { (movie.director) }
            td class="p-3 font-mono" { (format_budget(movie.budget)) }
            td class="p-3" { (movie.location) }
            td class="p-3" { (movie.duration) }
            td class="p-3" { (movie.year) }
            td class="p-3 text-right whitespace-nowrap" {
                a class="text-blue-600 hover:text-blue-800" href=(format!("/ui/movies/{}/edit", movie.id)) { "Edit" }
                " · "
                a class="text-red-600 hover:text-red-800" href=(format!("/ui/movies/{}/delete", movie.id)) { "Delete" }
            }
        }
    }
}

fn pagination(view: &ListView<'_>) -> Markup {
    let link = |page: u64| {
        format!(
            "/?page={page}&limit={}&q={}",
            view.page.limit,
            urlencoding::encode(view.query)
        )
    };
    html! {
        @if view.total_pages > 1 {
            nav class="mt-6 flex items-center justify-between text-sm" {
                @if view.page.page > 1 {
                    a class="text-blue-600 hover:text-blue-800" href=(link(view.page.page - 1)) { "Previous" }
                } @else {
                    span {}
                }
                span class="text-gray-500" { "Page " (view.page.page) " of " (view.total_pages) }
                @if view.page.page < view.total_pages {
                    a class="text-blue-600 hover:text-blue-800" href=(link(view.page.page + 1)) { "Next" }
                } @else {
                    span {}
                }
            }
        }
    }
}

fn text_field(form: &MovieForm<'_>, name: &str, label: &str, input_type: &str) -> Markup {
    let value = form.values.get(name).map(String::as_str).unwrap_or_default();
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class="mt-2 w-full rounded-md border border-gray-300 px-3 py-2" type=(input_type) step=[(input_type == "number").then_some("any")] name=(name) id=(name) value=(value);
            (field_error(form, name))
        }
    }
}

fn field_error(form: &MovieForm<'_>, name: &str) -> Markup {
    html! {
        @if let Some(message) = form.errors.and_then(|e| e.message_for(name)) {
            p class="mt-2 text-sm text-red-600" { (message) }
        }
    }
}

fn kind_label(kind: MovieKind) -> &'static str {
    match kind {
        MovieKind::Movie => "Movie",
        MovieKind::TvShow => "TV Show",
    }
}

fn format_budget(budget: f64) -> String {
    if budget.fract() == 0.0 { format!("${budget:.0}") } else { format!("${budget:.2}") }
}
