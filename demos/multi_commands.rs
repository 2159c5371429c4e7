use argtree::{ArgumentParser, Context};

fn root(cx: &Context<'_>) -> anyhow::Result<()> {
    println!("mode: {}", cx.get_string("mode")?);
    println!("config: {}", cx.get_string("config")?);
    println!("force: {}", cx.get_bool("force")?);
    Ok(())
}

fn upload(cx: &Context<'_>) -> anyhow::Result<()> {
    println!("mode: {}", cx.get_string("mode")?);
    println!("file: {}", cx.get_string("file")?);
    Ok(())
}

fn download(cx: &Context<'_>) -> anyhow::Result<()> {
    let out = cx.get_string("out")?;
    println!("mode: {}", cx.get_string("mode")?);
    println!("out: {out}");
    if out.len() < 3 {
        anyhow::bail!("The output file len less than 3.");
    }
    Ok(())
}

fn build() -> ArgumentParser {
    let mut app = ArgumentParser::new("app", "Sample tool for argtree");
    let cmd = app.root();
    app.add_option(cmd, "mode", "testing mode").short('m').long("mode").default("test");
    app.add_option(cmd, "config", "config file").short('c').long("config").default("/tmp/config.json");
    app.add_option(cmd, "force", "force do something").short('f').boolean(true);
    app.set_handler(cmd, root);

    let cmd = app.add_subcommand(app.root(), "upload", "Upload file to cloud");
    app.add_option(cmd, "file", "file name").required().default("test");
    app.set_handler(cmd, upload);

    let cmd = app.add_subcommand(app.root(), "download", "Download file from cloud");
    app.add_option(cmd, "out", "file name").short('o').default("a.out");
    app.set_handler(cmd, download);

    app
}

fn main() {
    env_logger::init();
    build().parse_from_env().handle_or_exit();
}
