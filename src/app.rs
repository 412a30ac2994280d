use leptos::ev::SubmitEvent;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::server_fn::error::NoCustomError;
use leptos::task::spawn_local;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    hooks::use_navigate,
    path, NavigateOptions,
};

use crate::model::{ChallengeItem, RankingEntry};
#[cfg(feature = "ssr")]
use crate::{
    create_admin_session,
    history::{list_entries, list_ranking, slugify},
    store::{RecordStore, SqliteStore, CHALLENGES, RANKING},
    validate_admin_token,
};
#[cfg(feature = "ssr")]
use std::env;

#[cfg(feature = "ssr")]
use diesel::r2d2::{ConnectionManager, Pool};
#[cfg(feature = "ssr")]
use diesel::SqliteConnection;
#[cfg(feature = "ssr")]
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Number of challenges shown on the home page.
pub const LATEST_CHALLENGES_LIMIT: usize = 5;

// The read server functions return Ok(None) when the collection has no
// records at all, so the pages can tell "no data" apart from an error.

#[server(GetLatestChallenges)]
pub async fn get_latest_challenges(
    limit: usize,
) -> Result<Option<Vec<ChallengeItem>>, ServerFnError<NoCustomError>> {
    let pool: DbPool = expect_context();
    let result = tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
        let snapshot = SqliteStore::new(&mut conn)
            .fetch_collection(CHALLENGES)
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
        Ok(snapshot.map(|snap| {
            let mut items = list_entries(&snap);
            items.truncate(limit);
            items
        }))
    })
    .await;
    match result {
        Ok(items) => items,
        Err(e) => Err(ServerFnError::ServerError(e.to_string())),
    }
}

#[server(GetChallenges)]
pub async fn get_challenges() -> Result<Option<Vec<ChallengeItem>>, ServerFnError<NoCustomError>> {
    let pool: DbPool = expect_context();
    let result = tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
        let snapshot = SqliteStore::new(&mut conn)
            .fetch_collection(CHALLENGES)
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
        Ok(snapshot.map(|snap| list_entries(&snap)))
    })
    .await;
    match result {
        Ok(items) => items,
        Err(e) => Err(ServerFnError::ServerError(e.to_string())),
    }
}

#[server(GetRanking)]
pub async fn get_ranking() -> Result<Option<Vec<RankingEntry>>, ServerFnError<NoCustomError>> {
    let pool: DbPool = expect_context();
    let result = tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
        let snapshot = SqliteStore::new(&mut conn)
            .fetch_collection(RANKING)
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
        Ok(snapshot.map(|snap| list_ranking(&snap)))
    })
    .await;
    match result {
        Ok(rows) => rows,
        Err(e) => Err(ServerFnError::ServerError(e.to_string())),
    }
}

#[cfg(feature = "ssr")]
async fn extract_and_validate_admin_token(
    pool: DbPool,
) -> Result<Option<bool>, ServerFnError<NoCustomError>> {
    use axum::http::HeaderMap;
    use leptos_axum::extract;

    let headers: HeaderMap = extract()
        .await
        .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;

    let mut admin_token: Option<String> = None;
    if let Some(cookie_header) = headers.get(axum::http::header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(value) = cookie.strip_prefix("admin_token=") {
                    admin_token = Some(value.to_string());
                    break;
                }
            }
        }
    }

    let result = tokio::task::spawn_blocking(
        move || -> Result<Option<bool>, ServerFnError<NoCustomError>> {
            let mut conn = pool
                .get()
                .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
            match admin_token {
                Some(t) => {
                    let is_valid = validate_admin_token(&mut conn, &t)
                        .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
                    Ok(Some(is_valid))
                }
                None => Ok(None),
            }
        },
    )
    .await;

    match result {
        Ok(validity) => validity,
        Err(e) => Err(ServerFnError::ServerError(e.to_string())),
    }
}

// Checks if the current request is from an admin. Returns true if it is, false otherwise.
#[server(IsAdmin)]
pub async fn is_admin() -> Result<bool, ServerFnError<NoCustomError>> {
    let pool: DbPool = expect_context();
    let validity = extract_and_validate_admin_token(pool).await?;
    Ok(validity.unwrap_or(false)) // None -> false
}

// Returns an empty result if the current request is from an admin, or an error otherwise.
#[cfg(feature = "ssr")]
async fn check_admin() -> Result<(), ServerFnError<NoCustomError>> {
    let pool: DbPool = expect_context();
    let validity = extract_and_validate_admin_token(pool).await?;
    match validity {
        Some(true) => Ok(()),
        _ => Err(ServerFnError::ServerError("Unauthorized".to_string())),
    }
}

#[server(AdminLogin)]
pub async fn admin_login(password: String) -> Result<(), ServerFnError<NoCustomError>> {
    let pool: DbPool = expect_context();
    let admin_password = env::var("ADMIN_PASSWORD").map_err(|_| {
        ServerFnError::<NoCustomError>::ServerError("Admin password not set".to_string())
    })?;

    if password != admin_password {
        return Err(ServerFnError::ServerError("Invalid password".to_string()));
    }

    let result =
        tokio::task::spawn_blocking(move || -> Result<String, ServerFnError<NoCustomError>> {
            let mut conn = pool
                .get()
                .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
            create_admin_session(&mut conn).map_err(|e| ServerFnError::ServerError(e.to_string()))
        })
        .await;

    let token =
        result.map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))??;

    use leptos_axum::ResponseOptions;
    let resp: ResponseOptions = expect_context();
    let cookie = format!(
        "admin_token={}; Max-Age=86400; Path=/; HttpOnly; SameSite=Strict",
        token
    );
    resp.insert_header(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_str(&cookie)
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?,
    );

    Ok(())
}

#[server(AdminLogout)]
pub async fn admin_logout() -> Result<(), ServerFnError<NoCustomError>> {
    use leptos_axum::ResponseOptions;
    let resp: ResponseOptions = expect_context();
    let cookie = "admin_token=; Max-Age=0; Path=/; HttpOnly; SameSite=Strict";
    resp.insert_header(
        axum::http::header::SET_COOKIE,
        axum::http::HeaderValue::from_str(cookie)
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?,
    );
    Ok(())
}

/// Writes a challenge in the canonical `"YYYY-MM-DD: title"` string form.
/// An empty key derives one from the title. Returns the key written.
#[server(SaveChallenge)]
pub async fn save_challenge(
    key: String,
    date: String,
    title: String,
) -> Result<String, ServerFnError<NoCustomError>> {
    check_admin().await?;

    let pool: DbPool = expect_context();

    let result =
        tokio::task::spawn_blocking(move || -> Result<String, ServerFnError<NoCustomError>> {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(ServerFnError::ServerError("Title is required".to_string()));
            }
            let record_key = if key.trim().is_empty() {
                slugify(&title)
            } else {
                key.trim().to_string()
            };
            if record_key.is_empty() {
                return Err(ServerFnError::ServerError(
                    "Could not derive a key from the title".to_string(),
                ));
            }
            let date = date.trim();
            let value = if date.is_empty() {
                serde_json::Value::String(title)
            } else {
                serde_json::Value::String(format!("{}: {}", date, title))
            };

            let mut conn = pool
                .get()
                .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
            SqliteStore::new(&mut conn)
                .write_value(CHALLENGES, &record_key, &value)
                .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
            Ok(record_key)
        })
        .await;
    match result {
        Ok(key) => key,
        Err(e) => Err(ServerFnError::ServerError(e.to_string())),
    }
}

#[server(DeleteChallenge)]
pub async fn delete_challenge(key: String) -> Result<(), ServerFnError<NoCustomError>> {
    check_admin().await?;

    let pool: DbPool = expect_context();

    let result = tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
        SqliteStore::new(&mut conn)
            .delete_value(CHALLENGES, &key)
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
        Ok(())
    })
    .await;
    result.map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?
}

/// Writes a participant record in the raw object shape. An empty id derives
/// one from the name. Returns the id written.
#[server(SaveRankingEntry)]
pub async fn save_ranking_entry(
    id: String,
    name: String,
    points: u32,
    challenges_completed: u32,
) -> Result<String, ServerFnError<NoCustomError>> {
    check_admin().await?;

    let pool: DbPool = expect_context();

    let result =
        tokio::task::spawn_blocking(move || -> Result<String, ServerFnError<NoCustomError>> {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ServerFnError::ServerError("Name is required".to_string()));
            }
            let entry_id = if id.trim().is_empty() {
                slugify(&name)
            } else {
                id.trim().to_string()
            };
            if entry_id.is_empty() {
                return Err(ServerFnError::ServerError(
                    "Could not derive an id from the name".to_string(),
                ));
            }
            let value = serde_json::json!({
                "name": name,
                "points": points,
                "challengesCompleted": challenges_completed,
            });

            let mut conn = pool
                .get()
                .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
            SqliteStore::new(&mut conn)
                .write_value(RANKING, &entry_id, &value)
                .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
            Ok(entry_id)
        })
        .await;
    match result {
        Ok(id) => id,
        Err(e) => Err(ServerFnError::ServerError(e.to_string())),
    }
}

#[server(DeleteRankingEntry)]
pub async fn delete_ranking_entry(id: String) -> Result<(), ServerFnError<NoCustomError>> {
    check_admin().await?;

    let pool: DbPool = expect_context();

    let result = tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
        SqliteStore::new(&mut conn)
            .delete_value(RANKING, &id)
            .map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?;
        Ok(())
    })
    .await;
    result.map_err(|e| ServerFnError::<NoCustomError>::ServerError(e.to_string()))?
}

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/reptex.css" />

        <Title text="RepteX" />

        <Router>
            <SiteHeader />
            <main>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=path!("/") view=Home />
                    <Route path=path!("/challenges") view=AllChallenges />
                    <Route path=path!("/ranking") view=Ranking />
                    <Route path=path!("/admin/login") view=AdminLogin />
                    <Route path=path!("/admin") view=AdminDashboard />
                </Routes>
            </main>
            <SiteFooter />
        </Router>
    }
}

#[component]
fn SiteHeader() -> impl IntoView {
    view! {
        <header class="site-header">
            <a class="brand" href="/">
                "RepteX"
            </a>
            <nav>
                <a href="/challenges">"Challenges"</a>
                <a href="/ranking">"Ranking"</a>
                <a href="/admin">"Admin"</a>
            </nav>
        </header>
    }
}

#[component]
fn SiteFooter() -> impl IntoView {
    view! {
        <footer class="site-footer">
            <span class="muted">"RepteX · weekly challenges and standings"</span>
        </footer>
    }
}

#[component]
fn ChallengeCards(items: Vec<ChallengeItem>, headline: bool) -> impl IntoView {
    view! {
        <div class="card-list">
            {items
                .into_iter()
                .map(|item| {
                    view! {
                        <div class="card">
                            {if headline {
                                view! { <h3>{item.title}</h3> }.into_any()
                            } else {
                                view! { <strong>{item.title}</strong> }.into_any()
                            }}
                            <div class="muted">"Date: " {item.date}</div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
fn Home() -> impl IntoView {
    let latest = Resource::new(|| (), |_| get_latest_challenges(LATEST_CHALLENGES_LIMIT));

    view! {
        <div>
            <h1>"RepteX"</h1>
            <p class="muted">"A new challenge every week. Complete it, earn points, climb the ranking."</p>
            <h2>"Latest Challenges"</h2>
            <Suspense fallback=|| {
                view! { <div class="muted">"Loading..."</div> }
            }>
                {move || {
                    latest
                        .with(|maybe_result| match maybe_result {
                            Some(Ok(Some(items))) => {
                                view! { <ChallengeCards items=items.clone() headline=false /> }
                                    .into_any()
                            }
                            Some(Ok(None)) => {
                                view! { <div class="muted">"No challenges found."</div> }.into_any()
                            }
                            Some(Err(_)) => {
                                view! { <div class="muted">"Error loading challenges."</div> }
                                    .into_any()
                            }
                            None => view! { <div class="muted">"Loading..."</div> }.into_any(),
                        })
                }}
            </Suspense>
            <p>
                <a href="/challenges">"All challenges"</a>
                " · "
                <a href="/ranking">"Current ranking"</a>
            </p>
        </div>
    }
}

#[component]
fn AllChallenges() -> impl IntoView {
    let challenges = Resource::new(|| (), |_| get_challenges());

    view! {
        <div>
            <h1>"All Challenges"</h1>
            <Suspense fallback=|| {
                view! { <div class="muted">"Loading..."</div> }
            }>
                {move || {
                    challenges
                        .with(|maybe_result| match maybe_result {
                            Some(Ok(Some(items))) => {
                                view! { <ChallengeCards items=items.clone() headline=true /> }
                                    .into_any()
                            }
                            Some(Ok(None)) => {
                                view! { <div class="muted">"No challenges saved."</div> }.into_any()
                            }
                            Some(Err(_)) => {
                                view! { <div class="muted">"Error loading challenges."</div> }
                                    .into_any()
                            }
                            None => view! { <div class="muted">"Loading..."</div> }.into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}

/// Fixed demonstration rows shown when the ranking collection doesn't exist
/// yet. Display-only; nothing is written back.
fn demo_ranking() -> Vec<RankingEntry> {
    vec![
        RankingEntry {
            id: "u1".to_string(),
            name: "Anna".to_string(),
            points: 150,
            challenges_completed: 12,
        },
        RankingEntry {
            id: "u2".to_string(),
            name: "Pol".to_string(),
            points: 120,
            challenges_completed: 10,
        },
        RankingEntry {
            id: "u3".to_string(),
            name: "Mar".to_string(),
            points: 95,
            challenges_completed: 8,
        },
    ]
}

#[component]
fn RankingTable(rows: Vec<RankingEntry>) -> impl IntoView {
    view! {
        <table class="ranking-table">
            <thead>
                <tr>
                    <th>"Pos."</th>
                    <th>"Participant"</th>
                    <th>"Points"</th>
                    <th>"Challenges"</th>
                </tr>
            </thead>
            <tbody>
                {rows
                    .into_iter()
                    .enumerate()
                    .map(|(i, row)| {
                        view! {
                            <tr>
                                <td>
                                    <strong>{i + 1}</strong>
                                </td>
                                <td>{row.name}</td>
                                <td>{row.points}</td>
                                <td>{row.challenges_completed}</td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}

#[component]
fn Ranking() -> impl IntoView {
    let ranking = Resource::new(|| (), |_| get_ranking());

    view! {
        <div>
            <h1>"Ranking"</h1>
            <Suspense fallback=|| {
                view! { <div class="muted">"Loading..."</div> }
            }>
                {move || {
                    ranking
                        .with(|maybe_result| match maybe_result {
                            Some(Ok(Some(rows))) if rows.is_empty() => {
                                view! { <div class="muted">"No participants yet."</div> }.into_any()
                            }
                            Some(Ok(Some(rows))) => {
                                view! { <RankingTable rows=rows.clone() /> }.into_any()
                            }
                            Some(Ok(None)) => {
                                view! {
                                    <p class="muted">"No ranking data yet. Showing a demo:"</p>
                                    <RankingTable rows=demo_ranking() />
                                }
                                    .into_any()
                            }
                            Some(Err(_)) => {
                                view! { <div class="muted">"Error loading ranking."</div> }
                                    .into_any()
                            }
                            None => view! { <div class="muted">"Loading..."</div> }.into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn AdminLogin() -> impl IntoView {
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let p = password.get();
        if p.is_empty() {
            error.set("Please enter password.".to_string());
            return;
        }
        spawn_local(async move {
            match admin_login(p).await {
                Ok(_) => {
                    error.set(String::new());
                    let navigate = use_navigate();
                    navigate("/admin", NavigateOptions::default());
                }
                Err(e) => error.set(e.to_string()),
            }
        });
    };

    view! {
        <div>
            <h1>"Admin Login"</h1>
            <form on:submit=submit>
                <label>
                    "Password: "
                    <input
                        type="password"
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <button type="submit">"Login"</button>
            </form>
            {move || {
                if !error.get().is_empty() {
                    view! { <p>{error.get()}</p> }.into_any()
                } else {
                    view! {}.into_any()
                }
            }}
        </div>
    }
}

#[component]
fn AdminDashboard() -> impl IntoView {
    // Fetchers for various resources (state).
    let is_admin_fetcher = Resource::new(|| (), |_| is_admin());
    let challenges_fetcher = Resource::new(|| (), |_| get_challenges());
    let ranking_fetcher = Resource::new(|| (), |_| get_ranking());

    // Runs on the next "tick" and redirects to the admin login page if the user is not an admin.
    // NOTE: This effect does not capture any reactive values, so it won't run again.
    let navigate = use_navigate();
    Effect::new(move || {
        is_admin_fetcher.with(|maybe_result| {
            if let Some(Ok(false)) = maybe_result {
                navigate("/admin/login", NavigateOptions::default());
            }
        });
    });

    // Signals related to saving a challenge.
    let challenge_key = RwSignal::new(String::new());
    let challenge_date = RwSignal::new(String::new());
    let challenge_title = RwSignal::new(String::new());
    let challenge_error = RwSignal::new(String::new());
    let saved_challenge_key = RwSignal::new(String::new());

    // A handler for the save challenge submit button. On success, clears any
    // errors, shows the key that was written, and refreshes the list.
    let save_challenge_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let key = challenge_key.get();
        let date = challenge_date.get();
        let title = challenge_title.get();
        if title.trim().is_empty() {
            challenge_error.set("Title is required.".to_string());
            return;
        }
        spawn_local(async move {
            match save_challenge(key, date, title).await {
                Ok(written_key) => {
                    challenge_error.set(String::new());
                    saved_challenge_key.set(written_key);
                    challenge_key.set(String::new());
                    challenge_date.set(String::new());
                    challenge_title.set(String::new());

                    challenges_fetcher.refetch();
                }
                Err(e) => challenge_error.set(e.to_string()),
            }
        });
    };

    // Signals related to saving a ranking entry.
    let entry_id = RwSignal::new(String::new());
    let entry_name = RwSignal::new(String::new());
    let entry_points = RwSignal::new(0u32);
    let entry_challenges = RwSignal::new(0u32);
    let entry_error = RwSignal::new(String::new());
    let saved_entry_id = RwSignal::new(String::new());

    // A handler for the save ranking entry submit button. On success, clears
    // any errors, shows the id that was written, and refreshes the list.
    let save_entry_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let id = entry_id.get();
        let name = entry_name.get();
        let points = entry_points.get();
        let challenges_completed = entry_challenges.get();
        if name.trim().is_empty() {
            entry_error.set("Name is required.".to_string());
            return;
        }
        spawn_local(async move {
            match save_ranking_entry(id, name, points, challenges_completed).await {
                Ok(written_id) => {
                    entry_error.set(String::new());
                    saved_entry_id.set(written_id);
                    entry_id.set(String::new());
                    entry_name.set(String::new());
                    entry_points.set(0);
                    entry_challenges.set(0);

                    ranking_fetcher.refetch();
                }
                Err(e) => entry_error.set(e.to_string()),
            }
        });
    };

    let delete_challenge_click = move |key: String| {
        spawn_local(async move {
            if leptos::leptos_dom::helpers::window()
                .confirm_with_message("Delete this challenge?")
                .unwrap_or(false)
            {
                match delete_challenge(key).await {
                    Ok(_) => challenges_fetcher.refetch(),
                    Err(e) => log!("Error: {}", e),
                }
            }
        });
    };

    let delete_entry_click = move |id: String| {
        spawn_local(async move {
            if leptos::leptos_dom::helpers::window()
                .confirm_with_message("Delete this ranking entry?")
                .unwrap_or(false)
            {
                match delete_ranking_entry(id).await {
                    Ok(_) => ranking_fetcher.refetch(),
                    Err(e) => log!("Error: {}", e),
                }
            }
        });
    };

    let logout = move |_| {
        spawn_local(async move {
            let _ = admin_logout().await;
            let navigate = use_navigate();
            navigate("/", NavigateOptions::default());
        });
    };

    view! {
        <Suspense fallback=|| {
            "Loading..."
        }>
            {move || {
                if let Some(Ok(true)) = is_admin_fetcher.get() {
                    view! {
                        <div class="admin-container">
                            <header class="admin-header">
                                <h1>"Admin Dashboard"</h1>
                                <button class="btn-logout" on:click=logout>
                                    "Logout"
                                </button>
                            </header>

                            <section class="admin-section">
                                <h2>"Add or Update Challenge"</h2>
                                <form class="admin-form" on:submit=save_challenge_submit>
                                    <div class="form-group">
                                        <label>
                                            "Key (blank to derive from title): "
                                            <input
                                                class="form-input"
                                                type="text"
                                                placeholder="e.g., push-ups"
                                                prop:value=move || challenge_key.get()
                                                on:input=move |ev| {
                                                    challenge_key.set(event_target_value(&ev))
                                                }
                                            />
                                        </label>
                                    </div>
                                    <div class="form-group">
                                        <label>
                                            "Date: "
                                            <input
                                                class="form-input"
                                                type="date"
                                                prop:value=move || challenge_date.get()
                                                on:input=move |ev| {
                                                    challenge_date.set(event_target_value(&ev))
                                                }
                                            />
                                        </label>
                                    </div>
                                    <div class="form-group">
                                        <label>
                                            "Title: "
                                            <input
                                                class="form-input"
                                                type="text"
                                                placeholder="e.g., Do 20 push-ups"
                                                prop:value=move || challenge_title.get()
                                                on:input=move |ev| {
                                                    challenge_title.set(event_target_value(&ev))
                                                }
                                            />
                                        </label>
                                    </div>
                                    <button type="submit" class="btn-primary">
                                        "Save Challenge"
                                    </button>
                                </form>
                                {move || {
                                    if !challenge_error.get().is_empty() {
                                        view! { <p class="error">{challenge_error.get()}</p> }
                                            .into_any()
                                    } else {
                                        view! {}.into_any()
                                    }
                                }}
                                {move || {
                                    if !saved_challenge_key.get().is_empty() {
                                        view! {
                                            <p class="key-display">
                                                "Saved under key: " {saved_challenge_key.get()}
                                            </p>
                                        }
                                            .into_any()
                                    } else {
                                        view! {}.into_any()
                                    }
                                }}
                            </section>

                            <section class="admin-section">
                                <h2>"Challenges"</h2>
                                <Suspense fallback=|| {
                                    view! { <div class="muted">"Loading..."</div> }
                                }>
                                    {move || {
                                        challenges_fetcher
                                            .with(|maybe_result| match maybe_result {
                                                Some(Ok(Some(items))) => {
                                                    view! {
                                                        <ul class="admin-list">
                                                            {items
                                                                .iter()
                                                                .map(|item| {
                                                                    let key = item.key.clone();
                                                                    view! {
                                                                        <li>
                                                                            <strong>{item.title.clone()}</strong>
                                                                            <span class="muted">
                                                                                " (" {item.date.clone()} " · " {item.key.clone()} ")"
                                                                            </span>
                                                                            <button
                                                                                class="btn-danger"
                                                                                on:click=move |_| delete_challenge_click(key.clone())
                                                                            >
                                                                                "Delete"
                                                                            </button>
                                                                        </li>
                                                                    }
                                                                })
                                                                .collect_view()}
                                                        </ul>
                                                    }
                                                        .into_any()
                                                }
                                                Some(Ok(None)) => {
                                                    view! { <div class="muted">"No challenges stored."</div> }
                                                        .into_any()
                                                }
                                                _ => {
                                                    view! { <div class="muted">"Error loading challenges."</div> }
                                                        .into_any()
                                                }
                                            })
                                    }}
                                </Suspense>
                            </section>

                            <section class="admin-section">
                                <h2>"Add or Update Ranking Entry"</h2>
                                <form class="admin-form" on:submit=save_entry_submit>
                                    <div class="form-group">
                                        <label>
                                            "Id (blank to derive from name): "
                                            <input
                                                class="form-input"
                                                type="text"
                                                placeholder="e.g., u1"
                                                prop:value=move || entry_id.get()
                                                on:input=move |ev| entry_id.set(event_target_value(&ev))
                                            />
                                        </label>
                                    </div>
                                    <div class="form-group">
                                        <label>
                                            "Name: "
                                            <input
                                                class="form-input"
                                                type="text"
                                                placeholder="e.g., Anna"
                                                prop:value=move || entry_name.get()
                                                on:input=move |ev| entry_name.set(event_target_value(&ev))
                                            />
                                        </label>
                                    </div>
                                    <div class="form-group">
                                        <label>
                                            "Points: "
                                            <input
                                                class="form-input"
                                                type="number"
                                                min="0"
                                                prop:value=move || format!("{}", entry_points.get())
                                                on:input=move |ev| {
                                                    if let Ok(value) = event_target_value(&ev).parse::<u32>() {
                                                        entry_points.set(value);
                                                    }
                                                }
                                            />
                                        </label>
                                    </div>
                                    <div class="form-group">
                                        <label>
                                            "Challenges completed: "
                                            <input
                                                class="form-input"
                                                type="number"
                                                min="0"
                                                prop:value=move || format!("{}", entry_challenges.get())
                                                on:input=move |ev| {
                                                    if let Ok(value) = event_target_value(&ev).parse::<u32>() {
                                                        entry_challenges.set(value);
                                                    }
                                                }
                                            />
                                        </label>
                                    </div>
                                    <button type="submit" class="btn-primary">
                                        "Save Entry"
                                    </button>
                                </form>
                                {move || {
                                    if !entry_error.get().is_empty() {
                                        view! { <p class="error">{entry_error.get()}</p> }.into_any()
                                    } else {
                                        view! {}.into_any()
                                    }
                                }}
                                {move || {
                                    if !saved_entry_id.get().is_empty() {
                                        view! {
                                            <p class="key-display">
                                                "Saved under id: " {saved_entry_id.get()}
                                            </p>
                                        }
                                            .into_any()
                                    } else {
                                        view! {}.into_any()
                                    }
                                }}
                            </section>

                            <section class="admin-section">
                                <h2>"Ranking Entries"</h2>
                                <Suspense fallback=|| {
                                    view! { <div class="muted">"Loading..."</div> }
                                }>
                                    {move || {
                                        ranking_fetcher
                                            .with(|maybe_result| match maybe_result {
                                                Some(Ok(Some(rows))) => {
                                                    view! {
                                                        <ul class="admin-list">
                                                            {rows
                                                                .iter()
                                                                .map(|row| {
                                                                    let id = row.id.clone();
                                                                    view! {
                                                                        <li>
                                                                            <strong>{row.name.clone()}</strong>
                                                                            <span class="muted">
                                                                                " (" {row.points} " pts · "
                                                                                {row.challenges_completed} " challenges · "
                                                                                {row.id.clone()} ")"
                                                                            </span>
                                                                            <button
                                                                                class="btn-danger"
                                                                                on:click=move |_| delete_entry_click(id.clone())
                                                                            >
                                                                                "Delete"
                                                                            </button>
                                                                        </li>
                                                                    }
                                                                })
                                                                .collect_view()}
                                                        </ul>
                                                    }
                                                        .into_any()
                                                }
                                                Some(Ok(None)) => {
                                                    view! { <div class="muted">"No ranking entries stored."</div> }
                                                        .into_any()
                                                }
                                                _ => {
                                                    view! { <div class="muted">"Error loading ranking."</div> }
                                                        .into_any()
                                                }
                                            })
                                    }}
                                </Suspense>
                            </section>
                        </div>
                    }
                        .into_any()
                } else {
                    view! { <p>"Checking admin session..."</p> }.into_any()
                }
            }}
        </Suspense>
    }
}
