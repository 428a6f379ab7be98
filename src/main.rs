//! geoclock main entrypoint.

use geoclock::hint_for;
use geoclock::run;
use geoclock::ui::messages::{error, hint};

fn main() {
    if let Err(e) = run() {
        error(&e);
        if let Some(h) = hint_for(&e) {
            hint(h);
        }
        std::process::exit(1);
    }
}
