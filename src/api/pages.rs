//! Web route handlers
//!
//! Server-rendered pages: the news feed, the auth flows, and the news
//! create/edit/delete flows. Handlers stay thin; visibility and ownership
//! rules live in the services.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use tera::Context;

use crate::models::{NewsDraft, User};
use crate::services::{RegisterInput, UserServiceError};

use super::forms::{LoginForm, NewsForm, RegisterForm};
use super::middleware::{AppState, AuthenticatedUser, MaybeUser, WebError};

fn base_context(user: Option<&User>) -> Context {
    let mut context = Context::new();
    context.insert("current_user", &user);
    context
}

fn render(state: &AppState, template: &str, context: &Context) -> Result<Html<String>, WebError> {
    Ok(Html(state.views.render(template, context)?))
}

/// GET / - the news feed
pub async fn index(
    State(state): State<AppState>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
) -> Result<Html<String>, WebError> {
    let news = state.news_service.feed(user.as_ref().map(|u| u.id)).await?;

    let mut context = base_context(user.as_ref());
    context.insert("news", &news);
    render(&state, "index.html", &context)
}

// ============================================================================
// Auth pages
// ============================================================================

fn login_context(email: &str, message: Option<&str>) -> Context {
    let mut context = base_context(None);
    context.insert("email", email);
    context.insert("message", &message);
    context
}

/// GET /login
pub async fn login_page(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    render(&state, "login.html", &login_context("", None))
}

/// POST /login
pub async fn login_submit(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let form = LoginForm::from_pairs(&pairs);

    match state
        .user_service
        .authenticate(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            let token = state.sessions.issue(user.id, form.remember_me);
            let cookie = state.sessions.login_cookie(&token, form.remember_me);

            let mut response = Redirect::to("/").into_response();
            response.headers_mut().insert(
                header::SET_COOKIE,
                HeaderValue::from_str(&cookie)
                    .map_err(|e| WebError::Internal(anyhow::anyhow!(e)))?,
            );
            Ok(response)
        }
        Err(UserServiceError::AuthenticationError(message)) => Ok(render(
            &state,
            "login.html",
            &login_context(&form.email, Some(&message)),
        )?
        .into_response()),
        Err(err) => Err(WebError::Internal(err.into())),
    }
}

fn register_context(form: &RegisterForm, message: Option<&str>) -> Context {
    let mut context = base_context(None);
    context.insert("name", &form.name);
    context.insert("email", &form.email);
    context.insert("about", &form.about);
    context.insert("message", &message);
    context
}

/// GET /register
pub async fn register_page(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let empty = RegisterForm::from_pairs(&[]);
    render(&state, "register.html", &register_context(&empty, None))
}

/// POST /register
pub async fn register_submit(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let form = RegisterForm::from_pairs(&pairs);

    let input = RegisterInput {
        name: form.name.clone(),
        email: form.email.clone(),
        password: form.password.clone(),
        password_again: form.password_again.clone(),
        about: Some(form.about.clone()),
    };

    match state.user_service.register(input).await {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(UserServiceError::ValidationError(message))
        | Err(UserServiceError::UserExists(message)) => Ok(render(
            &state,
            "register.html",
            &register_context(&form, Some(&message)),
        )?
        .into_response()),
        Err(err) => Err(WebError::Internal(err.into())),
    }
}

/// GET /logout
pub async fn logout(State(state): State<AppState>) -> Result<Response, WebError> {
    let mut response = Redirect::to("/").into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&state.sessions.logout_cookie())
            .map_err(|e| WebError::Internal(anyhow::anyhow!(e)))?,
    );
    Ok(response)
}

// ============================================================================
// News pages
// ============================================================================

async fn news_form_context(
    state: &AppState,
    user: &User,
    form_title: &str,
    form: &NewsForm,
    errors: &[String],
) -> Result<Context, WebError> {
    let categories = state.category_service.list().await?;

    let mut context = base_context(Some(user));
    context.insert("form_title", form_title);
    context.insert("title", &form.title);
    context.insert("content", &form.content);
    context.insert("is_private", &form.is_private);
    context.insert("selected", &form.category_ids);
    context.insert("categories", &categories);
    context.insert("errors", errors);
    Ok(context)
}

/// GET /news - the create form
pub async fn news_create_page(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<Html<String>, WebError> {
    let empty = NewsForm::from_pairs(&[]);
    let context = news_form_context(&state, &user, "Add news", &empty, &[]).await?;
    render(&state, "news_form.html", &context)
}

/// POST /news
pub async fn news_create_submit(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let form = NewsForm::from_pairs(&pairs);

    let errors = form.validate();
    if !errors.is_empty() {
        let context = news_form_context(&state, &user, "Add news", &form, &errors).await?;
        return Ok(render(&state, "news_form.html", &context)?.into_response());
    }

    state
        .news_service
        .create(
            user.id,
            NewsDraft {
                title: form.title,
                content: form.content,
                is_private: form.is_private,
                category_ids: form.category_ids,
            },
        )
        .await?;

    Ok(Redirect::to("/").into_response())
}

/// GET /news/{id} - the edit form, owner only
pub async fn news_edit_page(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Html<String>, WebError> {
    let news = state
        .news_service
        .get_for_edit(id, user.id)
        .await?
        .ok_or(WebError::NotFound)?;

    let form = NewsForm {
        title: news.title,
        content: news.content,
        is_private: news.is_private,
        category_ids: news.category_ids,
    };
    let context = news_form_context(&state, &user, "Edit news", &form, &[]).await?;
    render(&state, "news_form.html", &context)
}

/// POST /news/{id}
pub async fn news_edit_submit(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let form = NewsForm::from_pairs(&pairs);

    let errors = form.validate();
    if !errors.is_empty() {
        let context = news_form_context(&state, &user, "Edit news", &form, &errors).await?;
        return Ok(render(&state, "news_form.html", &context)?.into_response());
    }

    let updated = state
        .news_service
        .update(
            id,
            user.id,
            NewsDraft {
                title: form.title,
                content: form.content,
                is_private: form.is_private,
                category_ids: form.category_ids,
            },
        )
        .await?;

    if !updated {
        return Err(WebError::NotFound);
    }

    Ok(Redirect::to("/").into_response())
}

/// GET,POST /news_delete/{id} - owner only; missing post is a 404
pub async fn news_delete(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    let deleted = state.news_service.delete(id, user.id).await?;

    if !deleted {
        return Err(WebError::NotFound);
    }

    Ok(Redirect::to("/").into_response())
}
