//! SEO documents: sitemap.xml and robots.txt.

use photoshare_common::AppResult;
use photoshare_db::repositories::{
    AlbumRepository, AlbumSort, CategoryRepository, PhotoQuery, PhotoRepository, UserRepository,
};

/// Upper bound of entries per section in the sitemap.
const SITEMAP_SECTION_LIMIT: u64 = 5000;

/// Service generating the crawler-facing documents.
#[derive(Clone)]
pub struct SeoService {
    photo_repo: PhotoRepository,
    album_repo: AlbumRepository,
    category_repo: CategoryRepository,
    user_repo: UserRepository,
    base_url: String,
}

impl SeoService {
    /// Create a new SEO service. `base_url` is the public URL of the
    /// instance without a trailing slash.
    #[must_use]
    pub fn new(
        photo_repo: PhotoRepository,
        album_repo: AlbumRepository,
        category_repo: CategoryRepository,
        user_repo: UserRepository,
        base_url: &str,
    ) -> Self {
        Self {
            photo_repo,
            album_repo,
            category_repo,
            user_repo,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the XML sitemap over static pages, public photos, public
    /// albums, categories, and photographers with public photos.
    pub async fn sitemap_xml(&self) -> AppResult<String> {
        let lastmod = chrono::Utc::now().format("%Y-%m-%d").to_string();

        let mut xml = String::with_capacity(16 * 1024);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

        for path in ["/", "/photos/", "/albums/", "/search/"] {
            push_url(&mut xml, &format!("{}{path}", self.base_url), &lastmod);
        }

        let photos = self
            .photo_repo
            .find_filtered(&PhotoQuery::public(), SITEMAP_SECTION_LIMIT, 0)
            .await?;
        for photo in photos {
            push_url(
                &mut xml,
                &format!("{}/photo/{}/", self.base_url, photo.id),
                &lastmod,
            );
        }

        let albums = self
            .album_repo
            .find_public(AlbumSort::Newest, SITEMAP_SECTION_LIMIT, 0)
            .await?;
        for album in albums {
            push_url(
                &mut xml,
                &format!("{}/album/{}/", self.base_url, album.id),
                &lastmod,
            );
        }

        let categories = self.category_repo.find_all().await?;
        for category in categories {
            push_url(
                &mut xml,
                &format!("{}/category/{}/", self.base_url, category.id),
                &lastmod,
            );
        }

        let photographers = self.user_repo.find_photographers(SITEMAP_SECTION_LIMIT).await?;
        for user in photographers {
            push_url(
                &mut xml,
                &format!("{}/profile/{}/", self.base_url, user.username),
                &lastmod,
            );
        }

        xml.push_str("</urlset>\n");
        Ok(xml)
    }

    /// Build robots.txt: allow everything except admin/private areas and
    /// point crawlers at the sitemap.
    #[must_use]
    pub fn robots_txt(&self) -> String {
        format!(
            "User-agent: *\n\
             Allow: /\n\
             \n\
             # Sitemap\n\
             Sitemap: {}/sitemap.xml\n\
             \n\
             # Disallow admin and private areas\n\
             Disallow: /admin/\n\
             Disallow: /private/\n\
             Disallow: /accounts/\n",
            self.base_url
        )
    }
}

fn push_url(xml: &mut String, loc: &str, lastmod: &str) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
    xml.push_str("  </url>\n");
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
