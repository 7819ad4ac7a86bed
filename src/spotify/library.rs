use crate::{
    error::Result,
    management::Session,
    types::{AlbumSummary, Paging, SavedAlbum, first_image},
};

use super::Spotify;

/// Page size of the saved albums section.
pub const SAVED_ALBUMS_LIMIT: u32 = 8;

impl Spotify {
    /// Returns the first eight albums saved in the user's library.
    ///
    /// A library without albums yields an empty list; only a failed call is
    /// an error.
    pub async fn saved_albums(&self, session: &Session) -> Result<Vec<AlbumSummary>> {
        let page: Paging<SavedAlbum> = self
            .get_json(
                session,
                "/me/albums",
                &[
                    ("offset", "0".to_string()),
                    ("limit", SAVED_ALBUMS_LIMIT.to_string()),
                ],
            )
            .await?;

        Ok(page
            .items
            .into_iter()
            .map(|item| AlbumSummary {
                image: first_image(&item.album.images),
                name: item.album.name,
            })
            .collect())
    }
}
