use lostfound::config::{Backend, Config};
use lostfound::model::{Item, ItemFields, ItemType};
use lostfound::store::Services;
use lostfound::submission::{ItemForm, SubmissionPipeline};
use lostfound::upload::ImageFile;
use mockito::{Matcher, Server};

fn keys_form() -> ItemForm {
    ItemForm {
        kind: ItemType::Found,
        title: "Car Keys".to_string(),
        description: "Three keys on a red ring".to_string(),
        category: "Keys".to_string(),
        location: "Parking Lot B".to_string(),
        contact_name: "Bob".to_string(),
        contact_email: "bob@example.org".to_string(),
        contact_phone: String::new(),
        image: Some(ImageFile::new("keys.png", vec![1, 2, 3])),
    }
}

fn pipeline(services: &Services) -> SubmissionPipeline {
    SubmissionPipeline::new(services.store.clone(), services.uploader.clone())
}

#[tokio::test]
async fn local_backend_embeds_images_and_writes_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };
    let services = Services::open(&config).unwrap();
    assert_eq!(services.backend, Backend::Local);

    let item = pipeline(&services).submit(&keys_form()).await.unwrap();
    assert_eq!(
        item.image_url.as_deref(),
        Some("data:image/png;base64,AQID")
    );
    assert_eq!(services.store.list().await.unwrap(), vec![item]);
}

#[tokio::test]
async fn remote_backend_uploads_then_posts() {
    let mut server = Server::new_async().await;
    let mut created = Item::new(
        ItemFields {
            kind: ItemType::Found,
            title: "Car Keys".to_string(),
            description: "Three keys on a red ring".to_string(),
            category: "Keys".to_string(),
            location: "Parking Lot B".to_string(),
            contact_name: "Bob".to_string(),
            contact_email: "bob@example.org".to_string(),
            contact_phone: None,
        },
        Some("/uploads/1.png".to_string()),
    );
    created.id = "1".to_string();

    let upload = server
        .mock("POST", "/api/upload")
        .with_status(200)
        .with_body(r#"{"imageUrl": "/uploads/1.png"}"#)
        .create_async()
        .await;
    let post = server
        .mock("POST", "/api/items")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "title": "Car Keys",
            "imageUrl": "/uploads/1.png"
        })))
        .with_status(201)
        .with_body(serde_json::to_string(&created).unwrap())
        .create_async()
        .await;

    let config = Config {
        backend: Backend::Remote,
        url: server.url(),
        ..Config::default()
    };
    let services = Services::open(&config).unwrap();
    assert_eq!(services.backend, Backend::Remote);

    let item = pipeline(&services).submit(&keys_form()).await.unwrap();

    upload.assert_async().await;
    post.assert_async().await;
    assert_eq!(item, created);
}

#[test]
fn remote_backend_with_bad_url_fails_to_open() {
    let config = Config {
        backend: Backend::Remote,
        url: "not a url".to_string(),
        ..Config::default()
    };
    assert!(Services::open(&config).is_err());
}
