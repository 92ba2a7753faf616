use streamdex_core::types::MediaKind;

use crate::PlayerError;

/// One external embed playback provider. Selection among them is a user
/// preference; no availability or quality guarantee is implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedProvider {
    pub name: &'static str,
    base: &'static str,
}

/// The fixed provider registry, in presentation order.
pub const PROVIDERS: [EmbedProvider; 4] = [
    EmbedProvider {
        name: "Server 1",
        base: "https://embed.su",
    },
    EmbedProvider {
        name: "Server 2",
        base: "https://vidbinge.dev",
    },
    EmbedProvider {
        name: "Server 3",
        base: "https://vidsrc.xyz",
    },
    EmbedProvider {
        name: "Server 4",
        base: "https://player.autoembed.cc",
    },
];

pub fn find_provider(name: &str) -> Option<&'static EmbedProvider> {
    PROVIDERS.iter().find(|p| p.name == name)
}

/// What to play: a title plus, for shows, the season/episode coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackTarget {
    pub media_id: i64,
    pub kind: MediaKind,
    pub season: Option<i64>,
    pub episode: Option<i64>,
}

impl EmbedProvider {
    /// Build the embed URL for a target. Pure string templating; the frame's
    /// own load behavior is never observed.
    pub fn embed_url(&self, target: &PlaybackTarget) -> Result<String, PlayerError> {
        match target.kind {
            MediaKind::Movie => Ok(format!("{}/embed/movie/{}", self.base, target.media_id)),
            MediaKind::Show => {
                let (season, episode) = target
                    .season
                    .zip(target.episode)
                    .ok_or(PlayerError::MissingEpisode)?;
                Ok(format!(
                    "{}/embed/tv/{}/{}/{}",
                    self.base, target.media_id, season, episode
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64) -> PlaybackTarget {
        PlaybackTarget {
            media_id: id,
            kind: MediaKind::Movie,
            season: None,
            episode: None,
        }
    }

    #[test]
    fn movie_urls_for_every_provider() {
        let urls: Vec<String> = PROVIDERS
            .iter()
            .map(|p| p.embed_url(&movie(27205)).unwrap())
            .collect();

        assert_eq!(
            urls,
            vec![
                "https://embed.su/embed/movie/27205",
                "https://vidbinge.dev/embed/movie/27205",
                "https://vidsrc.xyz/embed/movie/27205",
                "https://player.autoembed.cc/embed/movie/27205",
            ]
        );
    }

    #[test]
    fn show_url_includes_season_and_episode() {
        let target = PlaybackTarget {
            media_id: 1396,
            kind: MediaKind::Show,
            season: Some(2),
            episode: Some(5),
        };
        let url = find_provider("Server 3").unwrap().embed_url(&target).unwrap();
        assert_eq!(url, "https://vidsrc.xyz/embed/tv/1396/2/5");
    }

    #[test]
    fn show_without_episode_is_rejected() {
        let target = PlaybackTarget {
            media_id: 1396,
            kind: MediaKind::Show,
            season: Some(2),
            episode: None,
        };
        let err = PROVIDERS[0].embed_url(&target).unwrap_err();
        assert!(matches!(err, PlayerError::MissingEpisode));
    }

    #[test]
    fn movie_ignores_stray_episode_coordinates() {
        let target = PlaybackTarget {
            media_id: 550,
            kind: MediaKind::Movie,
            season: Some(1),
            episode: Some(1),
        };
        let url = PROVIDERS[0].embed_url(&target).unwrap();
        assert_eq!(url, "https://embed.su/embed/movie/550");
    }

    #[test]
    fn provider_lookup_by_name() {
        assert_eq!(find_provider("Server 2").unwrap().name, "Server 2");
        assert!(find_provider("Server 5").is_none());
    }
}
