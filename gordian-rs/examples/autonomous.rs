//! Drive a Gordian script one statement per control tick.
//!
//! ```text
//! cargo run --example autonomous
//! ```

use std::io;
use std::thread;
use std::time::Duration;

use gordian::logging;
use gordian::script::{ActionQueue, Gordian, Step, Value};

const ROUTINE: &str = "\
# two-ball autonomous
speed = top_speed * 0.8
drive speed, 2
if alliance == \"red\"
  turn -90
else
  turn 90
end
shoot
drive -speed, 1
";

fn main() -> gordian::script::Result<()> {
    logging::init(false);

    let loader = |_: &str| -> io::Result<String> { Ok(ROUTINE.to_owned()) };
    let mut gordian = Gordian::new(loader, ActionQueue::new());
    gordian.set_global("top_speed", Value::Number(1.0));
    gordian.set_global("alliance", Value::Text("red".into()));

    gordian.start("two_ball")?;
    let mut tick = 0;
    loop {
        let step = gordian.step()?;
        if step == Step::Finished {
            break;
        }
        tick += 1;
        for action in gordian.dispatcher_mut().take_actions() {
            println!("tick {tick:>2}: {action}");
        }
        thread::sleep(Duration::from_millis(20));
    }
    Ok(())
}
