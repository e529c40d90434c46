use crate::app::App;
use crate::error::Result;
use crate::judge::{self, Connector};
use crate::ui::Terminal;

use super::Context;

pub fn browse(context: &Context) -> Result<()> {
    let config = context.config.clone();
    let connector: Connector = Box::new(move |name: &str| judge::connect(name, &config));

    let terminal = Terminal::enter()?;
    let mut app = App::new(
        terminal,
        connector,
        context.workspace.clone(),
        context.config.cpc.language,
        context.config.editor(),
    )?;
    app.run()
}
