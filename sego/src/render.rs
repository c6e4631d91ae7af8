//! 分かち書き結果の文字列化
//!
//! 検索モードでは、2つ以上の部分に細分割される単語を再帰的に展開し、
//! 細分割を持たない単語だけを出力します。細分割の各部分は元の単語より短いため、
//! 展開は必ず停止します。

use crate::token::{Token, TokenIter};

/// `token`を展開して得られる葉のトークンごとに`f`を呼び出します。
fn for_each_leaf<'a, F>(token: Token<'a>, f: &mut F)
where
    F: FnMut(&Token<'a>),
{
    let children = token.children();
    if children.len() > 1 {
        for child in children {
            for_each_leaf(child, f);
        }
    } else {
        f(&token);
    }
}

fn push_tagged(token: &Token, output: &mut String) {
    output.push_str(&String::from_utf8_lossy(token.text()));
    output.push('/');
    output.push_str(token.pos());
    output.push(' ');
}

pub(crate) fn to_tagged_string(tokens: TokenIter, search: bool) -> String {
    let mut output = String::new();
    for token in tokens {
        if search {
            for_each_leaf(token, &mut |leaf| push_tagged(leaf, &mut output));
        } else {
            push_tagged(&token, &mut output);
        }
    }
    output
}

pub(crate) fn to_strings(tokens: TokenIter, search: bool) -> Vec<String> {
    let mut output = Vec::with_capacity(tokens.len());
    for token in tokens {
        if search {
            for_each_leaf(token, &mut |leaf| {
                output.push(String::from_utf8_lossy(leaf.text()).into_owned())
            });
        } else {
            output.push(String::from_utf8_lossy(token.text()).into_owned());
        }
    }
    output
}

/// 細分割を再帰的に含めたトークン数を数えます。
pub(crate) fn count_keywords(tokens: TokenIter) -> usize {
    tokens.map(|token| 1 + count_keywords(token.children())).sum()
}
