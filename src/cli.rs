use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "beetle-counter")]
#[command(about = "画像を解析サーバーへ送り、甲虫の数を数える", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 解析サーバーのベースURL（環境変数・設定ファイルより優先）
    #[arg(long, global = true)]
    pub server_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を1枚アップロードして結果を表示
    Upload {
        /// 画像ファイルのパスまたは file:// URI
        #[arg(required = true)]
        image: String,

        /// 結果をJSONで保存
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 対話モード: 標準入力の1行を1回の画像選択として扱う
    ///
    /// 前の画像の解析中に次を選ぶと、前のアップロードは破棄される。
    Pick,

    /// 設定を表示/編集
    Config {
        /// サーバーURLを設定
        #[arg(long)]
        set_server_url: Option<String>,

        /// タイムアウト（秒）を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 接続タイムアウト（秒）を設定
        #[arg(long)]
        set_connect_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from([
            "beetle-counter",
            "--server-url",
            "http://host:5000",
            "upload",
            "beetles.jpg",
            "-o",
            "result.json",
        ])
        .unwrap();

        assert_eq!(cli.server_url.as_deref(), Some("http://host:5000"));
        match cli.command {
            Commands::Upload { image, output } => {
                assert_eq!(image, "beetles.jpg");
                assert_eq!(output, Some(PathBuf::from("result.json")));
            }
            _ => panic!("Expected Upload"),
        }
    }

    #[test]
    fn test_parse_config() {
        let cli = Cli::try_parse_from(["beetle-counter", "config", "--set-timeout", "45", "--show"]).unwrap();
        match cli.command {
            Commands::Config {
                set_server_url,
                set_timeout,
                set_connect_timeout,
                show,
            } => {
                assert!(set_server_url.is_none());
                assert_eq!(set_timeout, Some(45));
                assert!(set_connect_timeout.is_none());
                assert!(show);
            }
            _ => panic!("Expected Config"),
        }
    }

    #[test]
    fn test_parse_config_connect_timeout() {
        let cli = Cli::try_parse_from(["beetle-counter", "config", "--set-connect-timeout", "5"]).unwrap();
        match cli.command {
            Commands::Config {
                set_connect_timeout,
                set_timeout,
                ..
            } => {
                assert_eq!(set_connect_timeout, Some(5));
                assert!(set_timeout.is_none());
            }
            _ => panic!("Expected Config"),
        }
    }

    #[test]
    fn test_upload_requires_image() {
        assert!(Cli::try_parse_from(["beetle-counter", "upload"]).is_err());
    }
}
