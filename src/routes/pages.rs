use actix_web::{get, http::header::ContentType, HttpResponse, Responder};

const WELCOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Welcome Page</title>
<meta name="description" content="Welcome to our site">
</head>
<body>
<main>
<h1>Welcome to Our Website</h1>
<p>We are glad to have you here!</p>
</main>
</body>
</html>
"#;

/// Static landing page.
#[get("/")]
pub async fn welcome() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(WELCOME_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_web::test]
    async fn test_welcome_page() {
        let app = test::init_service(actix_web::App::new().service(welcome)).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );

        let body = test::read_body(resp).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Welcome to Our Website"));
        assert!(html.contains("We are glad to have you here!"));
    }
}
