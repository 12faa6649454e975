//! Tests for per-file stage tracking

#[cfg(test)]
mod tests {
    use chromachain::io::progress::{ProgressManager, Stage};
    use std::path::Path;

    // Tests stage ordering maps onto bar positions
    #[test]
    fn test_stage_positions() {
        assert_eq!(Stage::Loading.position(), 0);
        assert_eq!(Stage::Saving.position(), 3);
        assert_eq!(Stage::Done.position(), Stage::COUNT);
        assert_eq!(Stage::Failed.position(), Stage::COUNT);
        assert!(Stage::Modeling < Stage::Synthesizing);
        assert_eq!(Stage::Synthesizing.label(), "synthesizing");
    }

    // Tests files move through stages and finish
    // Verified with more files than individual bars to exercise batch mode
    #[test]
    fn test_file_lifecycle() {
        let mut manager = ProgressManager::new();
        manager.initialize(8);
        assert_eq!(manager.file_count(), 8);

        manager.start_file(0, Path::new("dir/first.png"));
        assert_eq!(manager.stage(0), Some(Stage::Loading));

        manager.advance(0, Stage::Synthesizing);
        assert_eq!(manager.stage(0), Some(Stage::Synthesizing));

        manager.complete_file(0);
        assert_eq!(manager.stage(0), Some(Stage::Done));

        manager.start_file(7, Path::new("last.png"));
        manager.fail_file(7);
        assert_eq!(manager.stage(7), Some(Stage::Failed));
        assert_eq!(manager.stage(3), Some(Stage::Loading));
        assert_eq!(manager.stage(8), None);

        manager.finish();
    }

    // Tests advancing unknown files is ignored
    #[test]
    fn test_advance_before_start_is_ignored() {
        let mut manager = ProgressManager::default();
        manager.initialize(1);

        manager.advance(0, Stage::Saving);

        assert_eq!(manager.stage(0), None);
    }
}
