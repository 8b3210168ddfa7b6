use arbsync::Notifier;

/// Prints notifications to the terminal: info to stdout, warnings to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }
}
