use crate::error::Player;

// Tracks stay exactly as configured so `currentFile` echoes the config
#[derive(Clone, Debug, Default)]
pub struct Playlist {
    tracks: Vec<String>,
    current_index: usize,
}

impl Playlist {
    #[must_use]
    pub fn new(tracks: Vec<String>) -> Self {
        log::info!("Loading playlist with {} tracks", tracks.len());
        Self {
            tracks,
            current_index: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn get_current_track(&self) -> Result<&str, Player> {
        self.tracks
            .get(self.current_index)
            .map(String::as_str)
            .ok_or(Player::EmptyPlaylist)
    }

    pub fn move_to_next_track(&mut self) -> Result<usize, Player> {
        if self.tracks.is_empty() {
            return Err(Player::EmptyPlaylist);
        }
        self.current_index = (self.current_index + 1) % self.tracks.len();
        Ok(self.current_index)
    }

    pub fn move_to_previous_track(&mut self) -> Result<usize, Player> {
        if self.tracks.is_empty() {
            return Err(Player::EmptyPlaylist);
        }
        self.current_index = if self.current_index == 0 {
            self.tracks.len() - 1
        } else {
            self.current_index - 1
        };
        Ok(self.current_index)
    }

    pub fn set_current_track_index(&mut self, index: usize) -> Result<(), Player> {
        if index >= self.tracks.len() {
            return Err(Player::EmptyPlaylist);
        }
        self.current_index = index;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_tracks() -> Playlist {
        Playlist::new(vec!["a.mp3".into(), "b.mp3".into(), "c.mp3".into()])
    }

    #[test]
    fn next_wraps_after_a_full_cycle() {
        let mut playlist = three_tracks();
        let before = playlist.get_current_track().unwrap().to_string();
        for _ in 0..playlist.len() {
            playlist.move_to_next_track().unwrap();
        }
        assert_eq!(playlist.get_current_track().unwrap(), before);
    }

    #[test]
    fn previous_at_zero_lands_on_last_track() {
        let mut playlist = three_tracks();
        assert_eq!(playlist.current_index(), 0);
        assert_eq!(playlist.move_to_previous_track().unwrap(), 2);
        assert_eq!(playlist.get_current_track().unwrap(), "c.mp3");
    }

    #[test]
    fn empty_playlist_reports_an_error() {
        let mut playlist = Playlist::new(Vec::new());
        assert_eq!(playlist.move_to_next_track(), Err(Player::EmptyPlaylist));
        assert_eq!(playlist.move_to_previous_track(), Err(Player::EmptyPlaylist));
        assert_eq!(playlist.get_current_track(), Err(Player::EmptyPlaylist));
    }

    #[test]
    fn set_index_rejects_out_of_range() {
        let mut playlist = three_tracks();
        playlist.set_current_track_index(2).unwrap();
        assert_eq!(playlist.get_current_track().unwrap(), "c.mp3");
        assert_eq!(
            playlist.set_current_track_index(3),
            Err(Player::EmptyPlaylist)
        );
        assert_eq!(playlist.current_index(), 2);
    }
}
