use beetle_counter::{cli, config, error, picker, record, session, uploader};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use indicatif::{ProgressBar, ProgressStyle};
use picker::LocalImageHandle;
use record::UploadRecord;
use session::{DisplayState, UploadPhase, UploadSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use uploader::UploadClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Upload { image, output } => {
            println!("🪲 beetle-counter - アップロード\n");

            let config = Config::load()?;
            let client = UploadClient::from_config(&config, cli.server_url.as_deref())?;
            let handle = LocalImageHandle::new(image);

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message(format!("解析中: {}", handle));
            spinner.enable_steady_tick(Duration::from_millis(100));

            let outcome = client.upload(&handle).await;
            spinner.finish_and_clear();

            match outcome {
                Ok(result) => {
                    println!("✔ 甲虫: {}", result.beetle_count);
                    println!("  元画像: {}", handle);
                    println!("  処理済み画像: {}", result.processed_image_url);

                    if let Some(path) = output {
                        UploadRecord::new(handle, &result).save(&path)?;
                        println!("✔ 結果を保存: {}", path.display());
                    }
                }
                Err(e) => {
                    println!("✖ {}", e.user_message());
                    return Err(e.into());
                }
            }
        }

        Commands::Pick => {
            let config = Config::load()?;
            let client = UploadClient::from_config(&config, cli.server_url.as_deref())?;
            println!("🪲 beetle-counter - 対話モード");
            println!("  サーバー: {}", client.base_url());
            println!("  画像のパスを1行ずつ入力してください（Ctrl-Dで終了）\n");

            run_pick_session(client).await?;
        }

        Commands::Config {
            set_server_url,
            set_timeout,
            set_connect_timeout,
            show,
        } => {
            // 壊れたファイルはここで上書きして直せるようにする
            let mut config = Config::load_or_default()?;

            if let Some(url) = set_server_url {
                config.set_server_url(url)?;
                println!("✔ サーバーURLを設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ タイムアウトを{}秒に設定しました", seconds);
            }

            if let Some(seconds) = set_connect_timeout {
                config.set_connect_timeout(seconds)?;
                println!("✔ 接続タイムアウトを{}秒に設定しました", seconds);
            }

            if show {
                println!("設定:");
                println!("  ファイル: {}", Config::config_path()?.display());
                println!(
                    "  サーバーURL: {}",
                    config.server_url.as_deref().unwrap_or("未設定")
                );
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  接続タイムアウト: {}秒", config.connect_timeout_seconds);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// 標準入力の各行を画像選択として流し、状態の変化を表示する
async fn run_pick_session(client: UploadClient) -> Result<()> {
    let session = UploadSession::new(Arc::new(client));

    let mut rx = session.subscribe();
    let renderer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            render_state(&state);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let reference = line.trim();
        if reference.is_empty() {
            continue;
        }
        session.pick(LocalImageHandle::new(reference));
    }

    let last = session.wait_settled().await;
    renderer.abort();

    if last.generation > 0 {
        println!("\n最終結果:");
        render_state(&last);
    }
    Ok(())
}

fn render_state(state: &DisplayState) {
    let image = state
        .image
        .as_ref()
        .map(|h| h.to_string())
        .unwrap_or_default();

    match &state.phase {
        UploadPhase::Idle => println!("- [#{}] 待機中", state.generation),
        UploadPhase::Requesting => println!("⏳ [#{}] 解析中: {}", state.generation, image),
        UploadPhase::Success(result) => {
            println!("✔ [#{}] 甲虫: {}", state.generation, result.beetle_count);
            println!("  元画像: {}", image);
            println!("  処理済み画像: {}", result.processed_image_url);
        }
        UploadPhase::Failed(e) => {
            println!("✖ [#{}] {}: {}", state.generation, image, e.user_message());
        }
    }
}
