//! Integration tests for the GitHub and GitLab backends against a
//! mock HTTP server.
//!
//! Each backend is pointed at a wiremock server so the request shape
//! (paths, headers, payload fields) and the error mapping can be
//! checked without a real forge.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use easy_merge::auth::TokenCheck;
use easy_merge::forge::github::{GitHubForge, GitHubTokenCheck};
use easy_merge::forge::gitlab::{GitLabForge, GitLabTokenCheck};
use easy_merge::forge::{CreatedRequest, Forge, ForgeError, MergeMethod, MergeRequestSpec};
use easy_merge::host::PlatformProbe;

fn spec() -> MergeRequestSpec {
    MergeRequestSpec {
        source_branch: "feature".to_string(),
        target_branch: "main".to_string(),
        title: "Add feature".to_string(),
        description: "Feature description".to_string(),
        squash: false,
        auto_merge: false,
    }
}

mod github {
    use super::*;

    #[tokio::test]
    async fn create_posts_pull_with_expected_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/pulls"))
            .and(header("Authorization", "Bearer tok"))
            .and(header("Accept", "application/vnd.github+json"))
            .and(header("X-GitHub-Api-Version", "2022-11-28"))
            .and(body_partial_json(json!({
                "title": "Add feature",
                "body": "Feature description",
                "head": "feature",
                "base": "main",
                "maintainer_can_modify": true
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 42,
                "html_url": "https://github.example/owner/repo/pull/42"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let forge = GitHubForge::with_api_base("tok", "owner/repo", server.uri());
        let created = forge.create_request(&spec()).await.unwrap();

        assert_eq!(created.number, 42);
        assert_eq!(created.url, "https://github.example/owner/repo/pull/42");
        assert_eq!(created.source_branch, "feature");
    }

    #[tokio::test]
    async fn merge_sends_method_and_waits_out_the_delay() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/repos/owner/repo/pulls/42/merge"))
            .and(body_partial_json(json!({ "merge_method": "squash" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "merged": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let forge = GitHubForge::with_api_base("tok", "owner/repo", server.uri());
        let request = CreatedRequest {
            number: 42,
            url: String::new(),
            source_branch: "feature".to_string(),
        };

        let started = std::time::Instant::now();
        forge
            .merge_request(&request, MergeMethod::Squash)
            .await
            .unwrap();
        // The backend pauses before calling the merge endpoint.
        assert!(started.elapsed() >= std::time::Duration::from_secs(1));
    }

    #[tokio::test]
    async fn source_branch_is_deleted_via_the_ref_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/repos/owner/repo/git/refs/heads/feature"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let forge = GitHubForge::with_api_base("tok", "owner/repo", server.uri());
        let request = CreatedRequest {
            number: 42,
            url: String::new(),
            source_branch: "feature".to_string(),
        };

        forge.delete_source_branch(&request).await.unwrap();
    }

    #[tokio::test]
    async fn status_codes_map_to_typed_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/pulls"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Validation Failed"
            })))
            .mount(&server)
            .await;

        let forge = GitHubForge::with_api_base("tok", "owner/repo", server.uri());
        let err = forge.create_request(&spec()).await.unwrap_err();

        assert!(matches!(err, ForgeError::ApiError { status: 422, .. }));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/pulls"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials"
            })))
            .mount(&server)
            .await;

        let forge = GitHubForge::with_api_base("tok", "owner/repo", server.uri());
        let err = forge.create_request(&spec()).await.unwrap_err();

        assert!(matches!(err, ForgeError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn token_check_hits_the_user_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("Authorization", "Bearer good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "octocat"
            })))
            .mount(&server)
            .await;

        let check = GitHubTokenCheck::with_api_base(server.uri());
        assert!(check.check("good").await.is_ok());
        assert!(matches!(
            check.check("bad").await,
            Err(ForgeError::NotFound(_)) | Err(ForgeError::AuthFailed(_))
        ));
    }
}

mod gitlab {
    use super::*;

    #[tokio::test]
    async fn create_posts_merge_request_with_expected_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/projects/group%2Fproject/merge_requests"))
            .and(header("PRIVATE-TOKEN", "tok"))
            .and(body_partial_json(json!({
                "source_branch": "feature",
                "target_branch": "main",
                "title": "Add feature",
                "description": "Feature description",
                "remove_source_branch": true,
                "squash": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "iid": 7,
                "web_url": "https://gitlab.example/group/project/-/merge_requests/7"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let forge = GitLabForge::with_base("tok", "group/project", server.uri());
        let created = forge.create_request(&spec()).await.unwrap();

        assert_eq!(created.number, 7);
        assert_eq!(
            created.url,
            "https://gitlab.example/group/project/-/merge_requests/7"
        );
    }

    #[tokio::test]
    async fn squash_flag_lands_in_the_creation_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/projects/group%2Fproject/merge_requests"))
            .and(body_partial_json(json!({ "squash": true })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "iid": 8,
                "web_url": "https://gitlab.example/group/project/-/merge_requests/8"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let forge = GitLabForge::with_base("tok", "group/project", server.uri());
        let mut squashed = spec();
        squashed.squash = true;
        forge.create_request(&squashed).await.unwrap();
    }

    #[tokio::test]
    async fn merge_puts_to_the_merge_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v4/projects/group%2Fproject/merge_requests/7/merge"))
            .and(header("PRIVATE-TOKEN", "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "state": "merged"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let forge = GitLabForge::with_base("tok", "group/project", server.uri());
        let request = CreatedRequest {
            number: 7,
            url: String::new(),
            source_branch: "feature".to_string(),
        };

        forge.merge_request(&request, MergeMethod::Merge).await.unwrap();
    }

    #[tokio::test]
    async fn list_shaped_error_bodies_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/projects/group%2Fproject/merge_requests"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "message": ["Another open merge request already exists"]
            })))
            .mount(&server)
            .await;

        let forge = GitLabForge::with_base("tok", "group/project", server.uri());
        let err = forge.create_request(&spec()).await.unwrap_err();

        match err {
            ForgeError::ApiError { status, message } => {
                assert_eq!(status, 409);
                assert!(message.contains("Another open merge request"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn token_check_hits_the_user_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/user"))
            .and(header("PRIVATE-TOKEN", "good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "username": "dev"
            })))
            .mount(&server)
            .await;

        let check = GitLabTokenCheck::with_base(server.uri());
        assert!(check.check("good").await.is_ok());
        assert!(check.check("bad").await.is_err());
    }
}

mod probe {
    use super::*;

    #[tokio::test]
    async fn json_answer_reads_as_an_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("{}", "application/json; charset=utf-8"),
            )
            .mount(&server)
            .await;

        assert!(PlatformProbe::new().serves_json_api(&server.uri()).await);
    }

    #[tokio::test]
    async fn html_answer_does_not() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("Content-Type", "text/html")
                    .set_body_string("<html></html>"),
            )
            .mount(&server)
            .await;

        assert!(!PlatformProbe::new().serves_json_api(&server.uri()).await);
    }

    #[tokio::test]
    async fn unreachable_host_does_not() {
        // Nothing listens here.
        assert!(
            !PlatformProbe::new()
                .serves_json_api("http://127.0.0.1:1")
                .await
        );
    }
}
