use serde::Serialize;
use tide::{Request, Response};

use crate::backend::{GalleryProvider, PhotoProvider};
use crate::models::galleries::{build_tree, Gallery};
use crate::models::photos::Photo;

mod utils;

use utils::render;

pub(in super::super) fn mount(route: &mut tide::Server<crate::State>) {
    route.at("/").get(home);
    route.at("/about").get(about);
    route.at("/contact").get(contact);
    route.at("/galleries").get(galleries);
    route.at("/galleries/:slug").get(gallery);
    route.at("/sitemap.xml").get(sitemap);
}

/// One slide of the home-page hero carousel.
#[derive(Debug, Serialize)]
struct CarouselImage {
    id: String,
    src: String,
    alt: String,
}

/// One tile in the masonry grid on gallery pages.
#[derive(Debug, Serialize)]
struct GalleryImage {
    id: String,
    src: String,
    alt: String,
}

#[derive(Debug, Serialize)]
struct GalleryCard {
    name: String,
    slug: String,
    description: Option<String>,
    cover_url: Option<String>,
    children: Vec<GalleryCard>,
}

#[derive(Debug, Serialize)]
struct Breadcrumb {
    name: String,
    slug: String,
}

fn gallery_card(state: &crate::State, gallery: &Gallery, thumb: &str) -> GalleryCard {
    let cover_url = gallery.cover_image.as_deref().map(|filename| {
        state
            .backend
            .file_url(&gallery.collection_id, &gallery.id, filename, Some(thumb))
    });

    GalleryCard {
        name: gallery.name.clone(),
        slug: gallery.slug.clone(),
        description: gallery.description.clone(),
        cover_url,
        children: gallery
            .children
            .iter()
            .map(|child| gallery_card(state, child, thumb))
            .collect(),
    }
}

fn gallery_image(state: &crate::State, photo: &Photo) -> GalleryImage {
    GalleryImage {
        id: photo.id.clone(),
        src: state
            .backend
            .file_url(&photo.collection_id, &photo.id, &photo.image, None),
        alt: photo.title.clone().unwrap_or_else(|| "Photo".to_string()),
    }
}

fn html_response(body: String) -> Response {
    Response::builder(tide::http::StatusCode::Ok)
        .content_type("text/html")
        .body(body)
        .build()
}

async fn home(req: Request<crate::State>) -> tide::Result<Response> {
    let state = req.state();

    let featured = state
        .backend
        .featured_photos(state.args.hero_photo_count.into())
        .await;
    let hero_images: Vec<CarouselImage> = featured
        .iter()
        .map(|photo| CarouselImage {
            id: photo.id.clone(),
            src: state
                .backend
                .file_url(&photo.collection_id, &photo.id, &photo.image, None),
            alt: photo.title.clone().unwrap_or_else(|| "Photo".to_string()),
        })
        .collect();

    let tree = build_tree(state.backend.galleries().await);
    let cards: Vec<GalleryCard> = tree
        .iter()
        .map(|root| gallery_card(state, root, "600x450"))
        .collect();

    let mut context = tera::Context::new();
    context.insert("cache_buster", &state.cache_busting_string);
    context.insert("title", "home");
    context.insert("canonical_href", &format!("{}/", state.args.base_url));
    context.insert("hero_images", &hero_images);
    context.insert("gallery_cards", &cards);

    let body = render(state, "home.html", &context)?;
    Ok(html_response(body))
}

async fn galleries(req: Request<crate::State>) -> tide::Result<Response> {
    let state = req.state();

    let tree = build_tree(state.backend.galleries().await);
    let cards: Vec<GalleryCard> = tree
        .iter()
        .map(|root| gallery_card(state, root, "400x300"))
        .collect();

    let mut context = tera::Context::new();
    context.insert("cache_buster", &state.cache_busting_string);
    context.insert("title", "galleries");
    context.insert(
        "canonical_href",
        &format!("{}/galleries", state.args.base_url),
    );
    context.insert("gallery_cards", &cards);

    let body = render(state, "galleries.html", &context)?;
    Ok(html_response(body))
}

async fn gallery(req: Request<crate::State>) -> tide::Result<Response> {
    let state = req.state();

    let slug = percent_encoding::percent_decode_str(req.param("slug")?)
        .decode_utf8_lossy()
        .to_string();

    let record = match state.backend.gallery_by_slug(&slug).await {
        Some(record) => record,
        None => return Ok(Response::builder(tide::http::StatusCode::NotFound).build()),
    };

    let all_galleries = state.backend.galleries().await;

    let sub_galleries: Vec<GalleryCard> = all_galleries
        .iter()
        .filter(|candidate| candidate.parent_id() == Some(record.id.as_str()))
        .map(|child| gallery_card(state, &Gallery::from(child.clone()), "300x200"))
        .collect();

    let parent = record
        .parent_id()
        .and_then(|parent_id| all_galleries.iter().find(|g| g.id == parent_id))
        .map(|parent| Breadcrumb {
            name: parent.name.clone(),
            slug: parent.slug.clone(),
        });

    // Parent galleries show a bounded random preview per sub-gallery; leaf
    // galleries show everything they have.
    let cap = if sub_galleries.is_empty() {
        None
    } else {
        Some(state.args.preview_photos_per_gallery as usize)
    };
    let photos = state.backend.photos_for_gallery(&record.id, true, cap).await;
    let images: Vec<GalleryImage> = photos
        .iter()
        .map(|photo| gallery_image(state, photo))
        .collect();

    let gallery = Gallery::from(record);

    let mut context = tera::Context::new();
    context.insert("cache_buster", &state.cache_busting_string);
    context.insert("title", &gallery.name);
    context.insert(
        "canonical_href",
        &format!("{}/galleries/{}", state.args.base_url, gallery.slug),
    );
    context.insert("gallery", &gallery);
    context.insert("parent", &parent);
    context.insert("sub_galleries", &sub_galleries);
    context.insert("photos", &images);

    let body = render(state, "gallery.html", &context)?;
    Ok(html_response(body))
}

async fn about(req: Request<crate::State>) -> tide::Result<Response> {
    let state = req.state();

    let mut context = tera::Context::new();
    context.insert("cache_buster", &state.cache_busting_string);
    context.insert("title", "about");
    context.insert("canonical_href", &format!("{}/about", state.args.base_url));

    let body = render(state, "about.html", &context)?;
    Ok(html_response(body))
}

async fn contact(req: Request<crate::State>) -> tide::Result<Response> {
    let state = req.state();

    let mut context = tera::Context::new();
    context.insert("cache_buster", &state.cache_busting_string);
    context.insert("title", "contact");
    context.insert(
        "canonical_href",
        &format!("{}/contact", state.args.base_url),
    );

    let body = render(state, "contact.html", &context)?;
    Ok(html_response(body))
}

async fn sitemap(req: Request<crate::State>) -> tide::Result<Response> {
    let state = req.state();

    let mut buf = Vec::new();
    let sitemap_writer = sitemap::writer::SiteMapWriter::new(&mut buf);
    let mut urlwriter = sitemap_writer.start_urlset()?;

    urlwriter.url(format!("{}/", state.args.base_url))?;
    urlwriter.url(format!("{}/about", state.args.base_url))?;
    urlwriter.url(format!("{}/contact", state.args.base_url))?;
    urlwriter.url(format!("{}/galleries", state.args.base_url))?;

    for gallery in state.backend.galleries().await {
        urlwriter.url(format!(
            "{}/galleries/{}",
            state.args.base_url, gallery.slug
        ))?;
    }

    urlwriter.end()?;

    let res = Response::builder(tide::http::StatusCode::Ok)
        .body(buf)
        .content_type(tide::http::mime::XML)
        .build();
    Ok(res)
}
