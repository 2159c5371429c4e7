use argtree::{ArgumentParser, Context};

fn greeting(cx: &Context<'_>) -> anyhow::Result<String> {
    let bang = if cx.get_bool("emoji")? { "❣️" } else { "!" };
    Ok(format!("Hello {}{}", cx.get_string("name")?, bang))
}

fn build() -> ArgumentParser {
    let mut app = ArgumentParser::new("hello", "Greets somebody");
    let root = app.root();
    app.add_option(root, "name", "who to greet").short('n').long("name").required();
    app.add_option(root, "emoji", "add an emoji").short('e').boolean(true);
    app.set_handler(root, |cx| {
        println!("{}", greeting(cx)?);
        Ok(())
    });
    app
}

fn main() {
    env_logger::init();
    build().parse_from_env().handle_or_exit();
}
