//! OAuth 2.0 for the Google Sheets API.
//!
//! `TokenProvider::initialize` runs the installed-app consent flow once: it prints a consent URL,
//! waits for Google to redirect the browser to a loopback listener, and exchanges the code for
//! tokens. After that, `TokenProvider::load` and `token_with_refresh` keep the access token fresh
//! using the stored refresh token without any browser interaction.

use crate::api::files::{SecretFile, TokenFile};
use crate::api::OAUTH_SCOPES;
use crate::error::Res;
use anyhow::{anyhow, Context};
use chrono::Utc;
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info};

const OAUTH_CALLBACK_PORT: u16 = 3030;

/// How long `finbot auth` waits for the browser to come back.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Used when Google does not say how long an access token lives.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// A client with the auth and token endpoints set, as required for the code and refresh exchanges.
type GoogleClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Holds the OAuth client credentials and the current token, refreshing the access token when it is
/// about to expire.
pub(crate) struct TokenProvider {
    secret: SecretFile,
    token: TokenFile,
}

impl TokenProvider {
    /// Runs the consent flow and saves a new token file at `token_path`.
    pub(crate) async fn initialize(
        secret_path: impl Into<PathBuf>,
        token_path: impl Into<PathBuf>,
    ) -> Res<Self> {
        let secret_path: PathBuf = secret_path.into();
        let secret = SecretFile::load(&secret_path).await?;
        let client = client(&secret)?;
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let (auth_url, csrf_token) = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(OAUTH_SCOPES.iter().map(|s| Scope::new(s.to_string())))
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .set_pkce_challenge(pkce_challenge)
            .url();

        info!("Open this URL in your browser to authorize access to your sheet:\n\n{auth_url}\n");
        info!("Waiting for the OAuth callback on http://localhost:{OAUTH_CALLBACK_PORT}");
        let code = wait_for_code(csrf_token.secret()).await?;

        let response = client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(&http_client()?)
            .await
            .map_err(|e| anyhow!("{e}"))
            .context("Failed to exchange the authorization code for a token")?;

        let refresh_token = response
            .refresh_token()
            .context("Google did not return a refresh token")?
            .secret()
            .to_string();
        let token = TokenFile::new(
            token_path,
            OAUTH_SCOPES.iter().map(|s| s.to_string()).collect(),
            response.access_token().secret().to_string(),
            refresh_token,
            expires_at(&response),
        );
        token.save().await?;
        info!("Authorization successful, token saved");
        Ok(Self { secret, token })
    }

    /// Loads existing credentials and token. Never opens a browser.
    pub(crate) async fn load(
        secret_path: impl Into<PathBuf>,
        token_path: impl Into<PathBuf>,
    ) -> Res<Self> {
        let secret_path: PathBuf = secret_path.into();
        let secret = SecretFile::load(&secret_path).await?;
        let token = TokenFile::load(token_path.into()).await?;
        Ok(Self { secret, token })
    }

    /// The current access token, which may be expired.
    pub(crate) fn token(&self) -> &str {
        self.token.access_token()
    }

    /// The current access token, refreshed first if it is expired or about to expire.
    pub(crate) async fn token_with_refresh(&mut self) -> Res<&str> {
        if self.token.is_expired() {
            self.refresh().await?;
        }
        Ok(self.token())
    }

    /// Exchanges the refresh token for a new access token and saves it.
    pub(crate) async fn refresh(&mut self) -> Res<()> {
        debug!("Refreshing the OAuth access token");
        let client = client(&self.secret)?;
        let response = client
            .exchange_refresh_token(&RefreshToken::new(self.token.refresh_token().to_string()))
            .request_async(&http_client()?)
            .await
            .map_err(|e| anyhow!("{e}"))
            .context("Failed to refresh the OAuth token, you may need to run 'finbot auth'")?;
        self.token.update(
            response.access_token().secret().to_string(),
            expires_at(&response),
            response.refresh_token().map(|rt| rt.secret().to_string()),
        );
        self.token.save().await?;
        debug!("Token valid until: {}", self.token.expires_at());
        Ok(())
    }
}

fn client(secret: &SecretFile) -> Res<GoogleClient> {
    let redirect = format!("http://localhost:{OAUTH_CALLBACK_PORT}");
    Ok(BasicClient::new(ClientId::new(secret.client_id().to_string()))
        .set_client_secret(ClientSecret::new(secret.client_secret().to_string()))
        .set_auth_uri(AuthUrl::new(secret.auth_uri().to_string()).context("Invalid auth_uri")?)
        .set_token_uri(TokenUrl::new(secret.token_uri().to_string()).context("Invalid token_uri")?)
        .set_redirect_uri(RedirectUrl::new(redirect).context("Invalid redirect URI")?))
}

fn http_client() -> Res<reqwest::Client> {
    reqwest::Client::builder()
        // Following redirects opens the client up to SSRF vulnerabilities.
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("Unable to build the HTTP client")
}

fn expires_at(response: &BasicTokenResponse) -> chrono::DateTime<Utc> {
    let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
    Utc::now() + chrono::Duration::from_std(lifetime).unwrap_or(chrono::Duration::hours(1))
}

/// Listens on the loopback callback port until the browser is redirected there, and returns the
/// `code` query parameter.
async fn wait_for_code(expected_state: &str) -> Res<String> {
    let listener = TcpListener::bind(("127.0.0.1", OAUTH_CALLBACK_PORT))
        .await
        .with_context(|| format!("Unable to listen on port {OAUTH_CALLBACK_PORT}"))?;
    tokio::time::timeout(CALLBACK_TIMEOUT, serve_callback(listener, expected_state))
        .await
        .context("Timed out waiting for the OAuth callback, run 'finbot auth' again")?
}

/// Serves HTTP on `listener` until a request carries the OAuth redirect parameters. Other requests,
/// such as a browser asking for `/favicon.ico`, get a 404 and the wait goes on.
async fn serve_callback(listener: TcpListener, expected_state: &str) -> Res<String> {
    let (sender, mut receiver) = mpsc::channel::<Res<String>>(1);
    loop {
        tokio::select! {
            Some(result) = receiver.recv() => return result,
            accepted = listener.accept() => {
                let (stream, _) = accepted.context("Failed to accept the OAuth callback")?;
                let sender = sender.clone();
                let expected_state = expected_state.to_string();
                let service = service_fn(move |request: Request<Incoming>| {
                    let response = answer_callback(request.uri().query(), &expected_state, &sender);
                    async move { Ok::<_, Infallible>(response) }
                });
                tokio::spawn(async move {
                    if let Err(e) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await
                    {
                        debug!("OAuth callback connection failed: {e}");
                    }
                });
            }
        }
    }
}

/// Answers one callback request and hands its outcome to `serve_callback`.
fn answer_callback(
    query: Option<&str>,
    expected_state: &str,
    sender: &mpsc::Sender<Res<String>>,
) -> Response<String> {
    let Some(result) = parse_callback(query, expected_state) else {
        let mut response = Response::new("Not found".to_string());
        *response.status_mut() = StatusCode::NOT_FOUND;
        return response;
    };
    let body = match &result {
        Ok(_) => "Authorization complete. You can close this window.",
        Err(_) => "Authorization failed. Check the terminal for details.",
    };
    if sender.try_send(result).is_err() {
        debug!("Ignoring a repeated OAuth callback");
    }
    Response::new(body.to_string())
}

/// Extracts the authorization code from the query of a callback request. Returns `None` when the
/// request is not an OAuth redirect at all.
fn parse_callback(query: Option<&str>, expected_state: &str) -> Option<Res<String>> {
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query?.as_bytes())
        .into_owned()
        .collect();
    if let Some(error) = param(&pairs, "error") {
        return Some(Err(anyhow!("Authorization was denied: {error}")));
    }
    let state = param(&pairs, "state");
    let code = param(&pairs, "code");
    if state.is_none() && code.is_none() {
        return None;
    }
    if state != Some(expected_state) {
        return Some(Err(anyhow!(
            "The OAuth callback state does not match, refusing the code"
        )));
    }
    Some(
        code.map(str::to_string)
            .context("The OAuth callback did not include a code"),
    )
}

fn param<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
