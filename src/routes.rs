use crate::{config::Config, files, request::Request, response::Response};

/// Maps a request to its response. Paths match case-sensitively.
pub fn route(request: &Request, config: &Config) -> Response {
    let target = request.target.as_str();

    if target == "/" {
        return Response::new(200);
    }

    if target == "/user-agent" {
        return user_agent(request);
    }

    if let Some(content) = target.strip_prefix("/echo/") {
        return echo(content);
    }

    if let (Some(rest), Some(directory)) = (target.strip_prefix("/files/"), config.directory()) {
        return file(request, directory, rest);
    }

    Response::new(404)
}

fn echo(content: &str) -> Response {
    tracing::debug!(content, "echo");

    Response::text(200, content)
}

fn user_agent(req: &Request) -> Response {
    let user_agent = req.headers.get("user-agent").unwrap_or_default();

    Response::text(200, user_agent)
}

fn file(req: &Request, directory: &std::path::Path, rest: &str) -> Response {
    let Some(path) = files::resolve(directory, rest) else {
        tracing::warn!(path = rest, "rejected path outside of serving directory");
        return Response::new(400);
    };

    match req.method.as_str() {
        "GET" => files::read_file(&path),
        "POST" => files::write_file(&path, &req.body),
        _ => Response::new(405),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn config_with(directory: Option<&std::path::Path>) -> Config {
        Config::new(
            "127.0.0.1:0".parse().unwrap(),
            directory.map(|d| d.to_path_buf()),
        )
    }

    fn get(raw: &str, config: &Config) -> Response {
        route(&Request::parse(raw.as_bytes()).unwrap(), config)
    }

    #[test]
    fn root_is_empty_ok() {
        let response = get("GET / HTTP/1.1\r\n\r\n", &config_with(None));

        assert_eq!(response, Response::new(200));
    }

    #[test]
    fn echo_returns_rest_verbatim() {
        let response = get("GET /echo/abc%20d/e HTTP/1.1\r\n\r\n", &config_with(None));

        assert_eq!(response.status, 200);
        assert_eq!(response.content_type.as_deref(), Some("text/plain"));
        assert_eq!(response.body, b"abc%20d/e");
    }

    #[rstest]
    #[case("GET /user-agent HTTP/1.1\r\nUser-Agent: test-client\r\n\r\n", "test-client")]
    #[case("GET /user-agent HTTP/1.1\r\nuser-agent:  Mozilla/5.0 \r\n\r\n", "Mozilla/5.0")]
    #[case("GET /user-agent HTTP/1.1\r\n\r\n", "")]
    fn user_agent_is_reflected(#[case] raw: &str, #[case] expected: &str) {
        let response = get(raw, &config_with(None));

        assert_eq!(response.status, 200);
        assert_eq!(response.body, expected.as_bytes());
    }

    #[rstest]
    #[case("GET /unknown HTTP/1.1\r\n\r\n")]
    #[case("GET /echo HTTP/1.1\r\n\r\n")]
    #[case("GET /Echo/abc HTTP/1.1\r\n\r\n")]
    #[case("GET /user-agent/x HTTP/1.1\r\n\r\n")]
    #[case("GET /files/a.txt HTTP/1.1\r\n\r\n")]
    fn unknown_routes_are_not_found(#[case] raw: &str) {
        assert_eq!(get(raw, &config_with(None)).status, 404);
    }

    #[test]
    fn files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with(Some(dir.path()));

        let created = get("POST /files/foo.txt HTTP/1.1\r\n\r\nhello", &config);
        assert_eq!(created.status, 201);

        let fetched = get("GET /files/foo.txt HTTP/1.1\r\n\r\n", &config);
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, b"hello");
    }

    #[rstest]
    #[case("DELETE")]
    #[case("PUT")]
    #[case("HEAD")]
    fn other_verbs_on_files_are_not_allowed(#[case] method: &str) {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!("{method} /files/x HTTP/1.1\r\n\r\n");

        assert_eq!(get(&raw, &config_with(Some(dir.path()))).status, 405);
    }

    #[test]
    fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with(Some(dir.path()));

        assert_eq!(get("GET /files/../secret HTTP/1.1\r\n\r\n", &config).status, 400);
        assert_eq!(get("POST /files/../x HTTP/1.1\r\n\r\nbody", &config).status, 400);
    }

    #[cfg(unix)]
    #[test]
    fn post_through_symlinked_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("dirlink")).unwrap();
        let config = config_with(Some(dir.path()));

        let response = get("POST /files/dirlink/pwned HTTP/1.1\r\n\r\nbody", &config);

        assert_eq!(response.status, 400);
        assert!(!outside.path().join("pwned").exists());
    }

    #[cfg(unix)]
    #[test]
    fn post_through_dangling_symlink_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path().join("target"), dir.path().join("dang")).unwrap();
        let config = config_with(Some(dir.path()));

        let response = get("POST /files/dang HTTP/1.1\r\n\r\nbody", &config);

        assert_eq!(response.status, 400);
        assert!(!outside.path().join("target").exists());
    }
}
